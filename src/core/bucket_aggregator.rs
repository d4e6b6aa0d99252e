use crate::core::keys::{BucketKey, MeasurementKind};
use crate::core::readings::NormalizedReading;
use indexmap::IndexMap;
use tracing::debug;

/// Values of one kind recorded for one site within one hour, in arrival order.
pub type Bucket = Vec<f64>;

/// All buckets of a single measurement kind. Keys keep the order in which they were first seen.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketCollection {
    kind: MeasurementKind,
    buckets: IndexMap<BucketKey, Bucket>,
}

impl BucketCollection {
    pub fn new(kind: MeasurementKind) -> Self {
        Self {
            kind,
            buckets: Default::default(),
        }
    }

    /// Build a collection from already grouped buckets.
    pub fn from_buckets(
        kind: MeasurementKind,
        buckets: impl IntoIterator<Item = (BucketKey, Bucket)>,
    ) -> Self {
        Self {
            kind,
            buckets: buckets.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    fn append(&mut self, key: BucketKey, value: f64) {
        self.buckets.entry(key).or_default().push(value);
    }

    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &Bucket)> {
        self.buckets.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BucketKey> {
        self.buckets.keys()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// The generation and irradiance buckets built from the same readings.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedBuckets {
    pub generation: BucketCollection,
    pub irradiance: BucketCollection,
}

/// Group readings into hourly buckets per site.
///
/// Each reading lands in exactly one generation bucket and one irradiance bucket, both under the
/// same key, so the two collections always have the same key set.
pub fn aggregate_readings(readings: Vec<NormalizedReading>) -> AggregatedBuckets {
    let mut generation = BucketCollection::new(MeasurementKind::Generation);
    let mut irradiance = BucketCollection::new(MeasurementKind::Irradiance);

    for NormalizedReading {
        hour_key,
        site,
        generation_kwh,
        irradiance_wh_m2,
    } in readings
    {
        let key = BucketKey::new(hour_key, site);
        generation.append(key.clone(), generation_kwh);
        irradiance.append(key, irradiance_wh_m2);
    }

    debug!(buckets = generation.len(), "aggregated readings into hourly buckets");

    AggregatedBuckets {
        generation,
        irradiance,
    }
}
