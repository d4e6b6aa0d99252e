use crate::core::bucket_aggregator::BucketCollection;
use crate::core::bucket_reducer::ReducedMap;
use crate::core::keys::BucketKey;
use crate::core::report_merger::{MissingSiblingBucketError, ReducedValue};
use crate::statistics::mean;
use indexmap::IndexMap;
use tracing::debug;

/// Accumulated irradiance of one site-hour, in the Wh/m2 units of the input summed over every
/// reading of that hour, at or below which no sunshine share is reported.
pub const SUNSHINE_THRESHOLD_WH_M2: f64 = 200.0;

/// How the irradiance of one site-hour is split across its readings.
#[derive(Clone, Debug, PartialEq)]
pub enum SunshineShare {
    /// Too little irradiance accumulated in the hour for the split to mean anything.
    NotApplicable,
    /// Each reading as a percentage of the hour's summed irradiance, in arrival order.
    Percentages(Vec<f64>),
}

impl SunshineShare {
    pub fn percentages(&self) -> Option<&[f64]> {
        match self {
            SunshineShare::NotApplicable => None,
            SunshineShare::Percentages(percentages) => Some(percentages),
        }
    }

    /// The value reported in the sunshine share column.
    pub fn mean(&self) -> Option<f64> {
        self.percentages().and_then(mean)
    }
}

pub type SunshineShareMap = IndexMap<BucketKey, SunshineShare>;

pub fn sunshine_shares(
    irradiance: &BucketCollection,
    summed_irradiance: &ReducedMap,
) -> Result<SunshineShareMap, MissingSiblingBucketError> {
    let mut shares = SunshineShareMap::with_capacity(irradiance.len());

    for (key, bucket) in irradiance.iter() {
        let sum = *summed_irradiance.get(key).ok_or_else(|| {
            MissingSiblingBucketError::new(key.clone(), ReducedValue::SummedIrradiance)
        })?;
        let share = if sum > SUNSHINE_THRESHOLD_WH_M2 {
            SunshineShare::Percentages(bucket.iter().map(|reading| reading / sum * 100.).collect())
        } else {
            SunshineShare::NotApplicable
        };
        shares.insert(key.clone(), share);
    }

    debug!(
        not_applicable = shares
            .values()
            .filter(|share| matches!(share, SunshineShare::NotApplicable))
            .count(),
        "calculated sunshine shares"
    );

    Ok(shares)
}
