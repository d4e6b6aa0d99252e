use crate::core::bucket_reducer::EmptyBucketError;
use crate::core::hour_normalizer::MalformedTimestampError;
use crate::core::report_merger::MissingSiblingBucketError;
use crate::read_readings_file::ReadingsFileError;
use thiserror::Error;

/// Every way a report run can fail. None of them leave a report behind.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not read readings: {0}")]
    ReadingsFile(#[from] ReadingsFileError),
    #[error(transparent)]
    MalformedTimestamp(#[from] MalformedTimestampError),
    #[error("Hourly buckets were built incorrectly: {0}")]
    EmptyBucket(#[from] EmptyBucketError),
    #[error("Hourly buckets were built incorrectly: {0}")]
    MissingSiblingBucket(#[from] MissingSiblingBucketError),
    #[error("Could not open report output: {0}")]
    Output(#[from] anyhow::Error),
    #[error("Could not write report: {0}")]
    WriteReport(#[from] csv::Error),
}
