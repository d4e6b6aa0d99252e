use crate::core::report_merger::ReportRow;
use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};
use thiserror::Error;

pub const REPORT_HEADER: [&str; 5] = [
    "Date",
    "Site",
    "Generation_KWh",
    "Average_irradiance_Wh_m2",
    "Sunshine_share_%",
];

/// Write the fixed header followed by one line per row. A row without a sunshine share gets an
/// empty field.
pub fn write_report(writer: impl Write, rows: &[ReportRow]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Parse a report in the layout produced by [`write_report`].
pub fn read_report(reader: impl Read) -> Result<Vec<ReportRow>, ReportFileError> {
    let mut reader = ReaderBuilder::new().from_reader(reader);

    let headers = reader.headers()?;
    if !headers.iter().eq(REPORT_HEADER) {
        return Err(ReportFileError::UnexpectedHeader(headers.iter().collect::<Vec<_>>().join(",")));
    }

    Ok(reader.deserialize().collect::<Result<Vec<ReportRow>, _>>()?)
}

#[derive(Debug, Error)]
pub enum ReportFileError {
    #[error("Report header '{0}' does not match the expected report layout")]
    UnexpectedHeader(String),
    #[error("Could not read report: {0}")]
    Csv(#[from] csv::Error),
}

/// Serde adapter writing an hour key as the report's `Date` value ("YYYY-MM-DD HH:00:00").
/// Used from the `with` attribute on [`ReportRow`].
pub(crate) mod report_date {
    use crate::core::keys::HourKey;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(hour_key: &HourKey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hour_key.report_date())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HourKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let report_date = String::deserialize(deserializer)?;

        HourKey::from_report_date(&report_date).map_err(D::Error::custom)
    }
}
