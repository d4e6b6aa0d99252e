use crate::core::bucket_reducer::ReducedMap;
use crate::core::keys::{BucketKey, HourKey, SiteId};
use crate::core::sunshine_share::SunshineShareMap;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;
use tracing::debug;

/// One line of the hourly report.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Date", with = "crate::report_file::report_date")]
    pub hour_key: HourKey,
    #[serde(rename = "Site")]
    pub site: SiteId,
    #[serde(rename = "Generation_KWh")]
    pub generation_delta: f64,
    #[serde(rename = "Average_irradiance_Wh_m2")]
    pub average_irradiance: f64,
    #[serde(rename = "Sunshine_share_%")]
    pub sunshine_share: Option<f64>,
}

/// The derived per-bucket values the report is assembled from.
pub struct MergeInputs<'a> {
    /// Drives which rows are produced and in which order.
    pub summed_generation: &'a ReducedMap,
    pub generation_deltas: &'a ReducedMap,
    pub average_irradiance: &'a ReducedMap,
    pub sunshine_shares: &'a SunshineShareMap,
}

/// Join the derived values into one row per generation bucket.
///
/// Generation and irradiance buckets are built from the same readings, so every generation key has
/// matching entries on the irradiance side; a missing one is reported rather than defaulted.
pub fn merge_report_rows(inputs: MergeInputs) -> Result<Vec<ReportRow>, MissingSiblingBucketError> {
    let MergeInputs {
        summed_generation,
        generation_deltas,
        average_irradiance,
        sunshine_shares,
    } = inputs;

    let rows = summed_generation
        .keys()
        .map(|key| -> Result<ReportRow, MissingSiblingBucketError> {
            let generation_delta = generation_deltas.get(key).copied().ok_or_else(|| {
                MissingSiblingBucketError::new(key.clone(), ReducedValue::GenerationDelta)
            })?;

            let irradiance_key = BucketKey::new(key.hour_key().clone(), key.site().clone());
            let average = average_irradiance
                .get(&irradiance_key)
                .copied()
                .ok_or_else(|| {
                    MissingSiblingBucketError::new(
                        irradiance_key.clone(),
                        ReducedValue::AverageIrradiance,
                    )
                })?;
            let sunshine_share = sunshine_shares.get(&irradiance_key).ok_or_else(|| {
                MissingSiblingBucketError::new(irradiance_key.clone(), ReducedValue::SunshineShare)
            })?;

            Ok(ReportRow {
                hour_key: key.hour_key().clone(),
                site: key.site().clone(),
                generation_delta,
                average_irradiance: average,
                sunshine_share: sunshine_share.mean(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = rows.len(), "merged report rows");

    Ok(rows)
}

/// Names the per-bucket value a lookup expected to find.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ReducedValue {
    #[strum(serialize = "summed irradiance")]
    SummedIrradiance,
    #[strum(serialize = "average irradiance")]
    AverageIrradiance,
    #[strum(serialize = "sunshine share")]
    SunshineShare,
    #[strum(serialize = "generation delta")]
    GenerationDelta,
}

#[derive(Debug, Error)]
#[error("No {missing} value exists for {key}, although its sibling bucket does")]
pub struct MissingSiblingBucketError {
    key: BucketKey,
    missing: ReducedValue,
}

impl MissingSiblingBucketError {
    pub(crate) fn new(key: BucketKey, missing: ReducedValue) -> Self {
        Self { key, missing }
    }

    pub fn key(&self) -> &BucketKey {
        &self.key
    }

    pub fn missing(&self) -> ReducedValue {
        self.missing
    }
}
