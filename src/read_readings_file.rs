use crate::core::keys::SiteId;
use crate::core::readings::Reading;
use csv::{ReaderBuilder as CsvReaderBuilder, StringRecord, Trim};
use std::io::Read;
use thiserror::Error;
use tracing::debug;

pub const COLUMN_TIMESTAMP: &str = "Timestamp_EasternTime";
pub const COLUMN_SITE: &str = "Site";
pub const COLUMN_GENERATION: &str = "Generation_Meter_Reading_KWh"; // kWh
pub const COLUMN_IRRADIANCE: &str = "Irradiance_Wh_m2"; // Wh/m2

/// Positions of the required columns within a record. Any other column is ignored.
#[derive(Clone, Copy, Debug)]
struct ColumnIndices {
    timestamp: usize,
    site: usize,
    generation: usize,
    irradiance: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self, MissingFieldError> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or(MissingFieldError { field: column, line: None })
        };

        Ok(Self {
            timestamp: position(COLUMN_TIMESTAMP)?,
            site: position(COLUMN_SITE)?,
            generation: position(COLUMN_GENERATION)?,
            irradiance: position(COLUMN_IRRADIANCE)?,
        })
    }
}

/// Read every reading from delimited text with a header row.
///
/// Header names and numeric fields may carry surrounding whitespace. Site and timestamp text is
/// taken verbatim.
pub fn readings_from_csv(file: impl Read) -> Result<Vec<Reading>, ReadingsFileError> {
    let mut reader = CsvReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(file);

    let columns = ColumnIndices::from_headers(reader.headers()?)?;

    let mut readings = vec![];
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|position| position.line());

        readings.push(Reading::new(
            field(&record, columns.timestamp, COLUMN_TIMESTAMP, line)?,
            SiteId::new(field(&record, columns.site, COLUMN_SITE, line)?),
            numeric_field(&record, columns.generation, COLUMN_GENERATION, line)?,
            numeric_field(&record, columns.irradiance, COLUMN_IRRADIANCE, line)?,
        ));
    }
    debug!(readings = readings.len(), "read readings file");

    Ok(readings)
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    name: &'static str,
    line: Option<u64>,
) -> Result<&'r str, MissingFieldError> {
    record
        .get(index)
        .ok_or(MissingFieldError { field: name, line })
}

fn numeric_field(
    record: &StringRecord,
    index: usize,
    name: &'static str,
    line: Option<u64>,
) -> Result<f64, ReadingsFileError> {
    let value = field(record, index, name, line)?;

    value.trim().parse().map_err(|_| {
        InvalidReadingError {
            field: name,
            value: value.to_string(),
            line,
        }
        .into()
    })
}

#[derive(Debug, Error)]
pub enum ReadingsFileError {
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    #[error(transparent)]
    InvalidReading(#[from] InvalidReadingError),
    #[error("Could not read delimited input: {0}")]
    Csv(#[from] csv::Error),
}

/// A required column is absent from the header, or a record is too short to hold it.
#[derive(Debug, Error)]
#[error("Required field '{field}' is missing{}", line_suffix(.line))]
pub struct MissingFieldError {
    field: &'static str,
    line: Option<u64>,
}

impl MissingFieldError {
    pub fn field(&self) -> &str {
        self.field
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }
}

#[derive(Debug, Error)]
#[error("Value '{value}' of field '{field}' is not a number{}", line_suffix(.line))]
pub struct InvalidReadingError {
    field: &'static str,
    value: String,
    line: Option<u64>,
}

impl InvalidReadingError {
    pub fn field(&self) -> &str {
        self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|line| format!(" on line {line}")).unwrap_or_default()
}
