use crate::core::bucket_aggregator::{AggregatedBuckets, Bucket, BucketCollection};
use crate::core::keys::{BucketKey, MeasurementKind};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// One scalar per bucket, in the bucket collection's key order.
pub type ReducedMap = IndexMap<BucketKey, f64>;

#[derive(Clone, Debug, PartialEq)]
pub struct ReducedBuckets {
    pub summed_generation: ReducedMap,
    pub summed_irradiance: ReducedMap,
    pub average_irradiance: ReducedMap,
}

/// Reduce generation buckets to sums and irradiance buckets to sums and averages.
pub fn reduce_buckets(buckets: &AggregatedBuckets) -> Result<ReducedBuckets, EmptyBucketError> {
    let summed_generation = sum_buckets(&buckets.generation)?;

    let mut summed_irradiance = ReducedMap::with_capacity(buckets.irradiance.len());
    let mut average_irradiance = ReducedMap::with_capacity(buckets.irradiance.len());
    for (key, bucket) in buckets.irradiance.iter() {
        let sum = bucket_sum(buckets.irradiance.kind(), key, bucket)?;
        summed_irradiance.insert(key.clone(), sum);
        average_irradiance.insert(key.clone(), sum / bucket.len() as f64);
    }

    debug!(
        generation_buckets = summed_generation.len(),
        irradiance_buckets = summed_irradiance.len(),
        "reduced hourly buckets"
    );

    Ok(ReducedBuckets {
        summed_generation,
        summed_irradiance,
        average_irradiance,
    })
}

fn sum_buckets(collection: &BucketCollection) -> Result<ReducedMap, EmptyBucketError> {
    collection
        .iter()
        .map(|(key, bucket)| {
            bucket_sum(collection.kind(), key, bucket).map(|sum| (key.clone(), sum))
        })
        .collect()
}

fn bucket_sum(
    kind: MeasurementKind,
    key: &BucketKey,
    bucket: &Bucket,
) -> Result<f64, EmptyBucketError> {
    if bucket.is_empty() {
        return Err(EmptyBucketError {
            kind,
            key: key.clone(),
        });
    }

    Ok(bucket.iter().sum())
}

/// Buckets are only ever created by appending a value, so an empty one means bucket construction
/// is broken.
#[derive(Debug, Error)]
#[error("The {kind} bucket for {key} holds no readings")]
pub struct EmptyBucketError {
    kind: MeasurementKind,
    key: BucketKey,
}

impl EmptyBucketError {
    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn key(&self) -> &BucketKey {
        &self.key
    }
}
