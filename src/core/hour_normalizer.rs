use crate::core::keys::HourKey;
use crate::core::readings::{NormalizedReading, Reading};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

/// chrono format of the timestamp column, e.g. "2024-01-01 09:15:42.123456"
pub const READING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%f";

/// chrono's `%f` takes up to nine digits; the input carries at most microseconds.
const MAX_FRACTION_DIGITS: usize = 6;

/// Truncate every reading's timestamp to an hour key.
///
/// Fails on the first timestamp that cannot be parsed; no readings are returned in that case.
pub fn normalize_readings(
    readings: Vec<Reading>,
) -> Result<Vec<NormalizedReading>, MalformedTimestampError> {
    let normalized = readings
        .into_iter()
        .map(normalize_reading)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(readings = normalized.len(), "normalized readings to hour keys");

    Ok(normalized)
}

pub fn normalize_reading(reading: Reading) -> Result<NormalizedReading, MalformedTimestampError> {
    let Reading {
        timestamp,
        site,
        generation_kwh,
        irradiance_wh_m2,
    } = reading;

    Ok(NormalizedReading {
        hour_key: hour_key_for_timestamp(&timestamp)?,
        site,
        generation_kwh,
        irradiance_wh_m2,
    })
}

pub fn hour_key_for_timestamp(timestamp: &str) -> Result<HourKey, MalformedTimestampError> {
    let fraction_digits = timestamp
        .rsplit_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    if fraction_digits > MAX_FRACTION_DIGITS {
        return Err(MalformedTimestampError::new(timestamp));
    }

    let date_time = NaiveDateTime::parse_from_str(timestamp, READING_TIMESTAMP_FORMAT)
        .map_err(|_| MalformedTimestampError::new(timestamp))?;

    Ok(HourKey::from_datetime(&date_time))
}

#[derive(Debug, Error)]
#[error("Timestamp '{timestamp}' does not match the expected format YYYY-MM-DD HH:MM:SS.ffffff")]
pub struct MalformedTimestampError {
    timestamp: String,
}

impl MalformedTimestampError {
    pub(crate) fn new(timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::SiteId;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("2024-01-01 09:15:42.123456", "2024-01-01 09")]
    #[case("2024-01-01 09:00:00.000000", "2024-01-01 09")]
    #[case("2024-01-01 09:59:59.999999", "2024-01-01 09")]
    #[case("2023-12-31 23:30:00.5", "2023-12-31 23")]
    #[case("2024-02-29 00:00:01.000001", "2024-02-29 00")]
    fn test_hour_key_is_timestamp_truncated_to_hour(
        #[case] timestamp: &str,
        #[case] expected: &str,
    ) {
        let hour_key = hour_key_for_timestamp(timestamp).unwrap();

        assert_eq!(hour_key.as_str(), expected);
        assert_eq!(hour_key.as_str(), &timestamp[..13]);
    }

    #[rstest]
    #[case("")]
    #[case("2024-01-01")]
    #[case("2024/01/01 09:00:00.000000")]
    #[case("2024-13-01 09:00:00.000000")]
    #[case("2024-01-01 24:00:00.000000")]
    #[case("01-01-2024 09:00:00.000000")]
    #[case("2024-01-01T09:00:00.000000")]
    #[case("2024-01-01 09:00:00")]
    #[case("2024-01-01 09:00:00.")]
    #[case("2024-01-01 09:00:00.1234567")]
    #[case("2024-01-01 09:00:00.123456789")]
    fn test_malformed_timestamp_is_rejected(#[case] timestamp: &str) {
        let error = hour_key_for_timestamp(timestamp).unwrap_err();

        assert_eq!(error.timestamp(), timestamp);
    }

    #[rstest]
    fn test_normalize_reading_keeps_other_fields() {
        let reading = Reading::new("2024-01-01 09:15:00.000000", SiteId::new("B"), 5.5, 120.25);

        let normalized = normalize_reading(reading).unwrap();

        assert_eq!(
            normalized,
            NormalizedReading {
                hour_key: hour_key_for_timestamp("2024-01-01 09:00:00.000000").unwrap(),
                site: SiteId::new("B"),
                generation_kwh: 5.5,
                irradiance_wh_m2: 120.25,
            }
        );
    }

    #[rstest]
    fn test_normalize_readings_fails_on_any_malformed_timestamp() {
        let readings = vec![
            Reading::new("2024-01-01 09:15:00.000000", SiteId::new("A"), 1., 10.),
            Reading::new("not a timestamp", SiteId::new("A"), 2., 20.),
        ];

        let error = normalize_readings(readings).unwrap_err();

        assert_eq!(error.timestamp(), "not a timestamp");
    }
}
