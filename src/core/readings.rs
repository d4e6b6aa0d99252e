use crate::core::keys::{HourKey, SiteId};

/// One record of the input file.
///
/// The timestamp is kept as the text found in the input; it is only interpreted when readings are
/// normalized to hour keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub timestamp: String,
    pub site: SiteId,
    pub generation_kwh: f64,
    pub irradiance_wh_m2: f64,
}

impl Reading {
    pub fn new(
        timestamp: impl Into<String>,
        site: SiteId,
        generation_kwh: f64,
        irradiance_wh_m2: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            site,
            generation_kwh,
            irradiance_wh_m2,
        }
    }
}

/// A [`Reading`] whose timestamp has been truncated to the hour it falls in.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedReading {
    pub hour_key: HourKey,
    pub site: SiteId,
    pub generation_kwh: f64,
    pub irradiance_wh_m2: f64,
}
