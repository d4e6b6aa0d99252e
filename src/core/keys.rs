use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::Display as StrumDisplay;

use crate::core::hour_normalizer::MalformedTimestampError;

/// chrono format string producing an hour key, e.g. "2024-01-01 09"
pub const HOUR_KEY_FORMAT: &str = "%Y-%m-%d %H";

/// chrono format string for the `Date` column of the report, e.g. "2024-01-01 09:00:00"
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A date-hour key of the form "YYYY-MM-DD HH".
///
/// The only ways to build one go through chrono formatting, so every key is fixed width and zero
/// padded. Comparing two keys as strings therefore orders them chronologically, which is what the
/// per-site delta calculation relies on.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HourKey(String);

impl HourKey {
    /// Truncate a date-time to the hour it falls in.
    pub fn from_datetime(date_time: &NaiveDateTime) -> Self {
        Self(date_time.format(HOUR_KEY_FORMAT).to_string())
    }

    /// Parse a report `Date` value ("YYYY-MM-DD HH:00:00") back into an hour key.
    ///
    /// Values with non-zero minutes or seconds are rejected, as the report only ever carries
    /// whole hours.
    pub fn from_report_date(report_date: &str) -> Result<Self, MalformedTimestampError> {
        let date_time = NaiveDateTime::parse_from_str(report_date, REPORT_DATE_FORMAT)
            .map_err(|_| MalformedTimestampError::new(report_date))?;
        if date_time.minute() != 0 || date_time.second() != 0 {
            return Err(MalformedTimestampError::new(report_date));
        }

        Ok(Self::from_datetime(&date_time))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the key as written to the `Date` column of the report.
    pub fn report_date(&self) -> String {
        format!("{}:00:00", self.0)
    }
}

impl Display for HourKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a metering site as it appears in the input.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(site: impl Into<String>) -> Self {
        Self(site.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SiteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SiteId {
    fn from(site: &str) -> Self {
        Self::new(site)
    }
}

/// What a bucket holds. Each bucket collection carries exactly one kind, so the kind is not part
/// of [`BucketKey`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, StrumDisplay)]
pub enum MeasurementKind {
    #[strum(serialize = "generation")]
    Generation,
    #[strum(serialize = "irradiance")]
    Irradiance,
}

/// Identifies one hourly bucket of one site.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BucketKey {
    hour_key: HourKey,
    site: SiteId,
}

impl BucketKey {
    pub fn new(hour_key: HourKey, site: SiteId) -> Self {
        Self { hour_key, site }
    }

    pub fn hour_key(&self) -> &HourKey {
        &self.hour_key
    }

    pub fn site(&self) -> &SiteId {
        &self.site
    }
}

impl Display for BucketKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "site {} at hour {}", self.site, self.hour_key)
    }
}

#[cfg(test)]
pub(crate) fn hour_key(hour_key: &str) -> HourKey {
    HourKey(hour_key.to_string())
}

#[cfg(test)]
pub(crate) fn bucket_key(hour: &str, site: &str) -> BucketKey {
    BucketKey::new(hour_key(hour), site.into())
}
