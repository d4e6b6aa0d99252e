pub mod core;
pub mod errors;
pub mod output;
pub mod read_readings_file;
pub mod report_file;
mod statistics;


pub use crate::core::keys::{BucketKey, HourKey, SiteId};
pub use crate::core::readings::Reading;
pub use crate::core::report_merger::ReportRow;
use crate::core::bucket_aggregator::aggregate_readings;
use crate::core::bucket_reducer::{reduce_buckets, ReducedBuckets};
use crate::core::hour_normalizer::normalize_readings;
use crate::core::report_merger::{merge_report_rows, MergeInputs};
use crate::core::site_delta::generation_deltas_by_site;
use crate::core::sunshine_share::sunshine_shares;
use crate::errors::ReportError;
use crate::output::{Output, OutputWriter};
use crate::read_readings_file::readings_from_csv;
use crate::report_file::write_report;
use itertools::Itertools;
use std::io::Read;
use tracing::info;

/// Location key the hourly report is written under.
pub const REPORT_LOCATION_KEY: &str = "hourly_report";

/// Counts describing a finished run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReportSummary {
    pub readings: usize,
    pub rows: usize,
    pub sites: usize,
    /// Rows whose sunshine share is not applicable.
    pub not_applicable: usize,
}

impl ReportSummary {
    fn from_rows(readings: usize, rows: &[ReportRow]) -> Self {
        Self {
            readings,
            rows: rows.len(),
            sites: rows.iter().map(|row| &row.site).unique().count(),
            not_applicable: rows
                .iter()
                .filter(|row| row.sunshine_share.is_none())
                .count(),
        }
    }
}

/// Read readings from `input`, derive the hourly report and write it to `output`.
///
/// Nothing is written unless every stage succeeds, and the report only lands at its location once
/// it has been written out in full. A no-op output skips writing altogether.
pub fn run_report(input: impl Read, output: impl Output) -> Result<ReportSummary, ReportError> {
    let readings = readings_from_csv(input)?;
    let reading_count = readings.len();

    let rows = build_report(readings)?;
    let summary = ReportSummary::from_rows(reading_count, &rows);

    if output.is_noop() {
        info!("output is a no-op, report not written");
    } else {
        info!("writing out to {REPORT_LOCATION_KEY}");
        let mut writer = output.writer_for_location_key(REPORT_LOCATION_KEY)?;
        write_report(&mut writer, &rows)?;
        writer.finish()?;
    }

    info!(
        readings = summary.readings,
        rows = summary.rows,
        sites = summary.sites,
        not_applicable = summary.not_applicable,
        "hourly report complete"
    );

    Ok(summary)
}

/// Derive the report rows from raw readings, without any I/O.
pub fn build_report(readings: Vec<Reading>) -> Result<Vec<ReportRow>, ReportError> {
    let normalized = normalize_readings(readings)?;
    let buckets = aggregate_readings(normalized);

    let ReducedBuckets {
        summed_generation,
        summed_irradiance,
        average_irradiance,
    } = reduce_buckets(&buckets)?;
    let generation_deltas = generation_deltas_by_site(&summed_generation);
    let sunshine_shares = sunshine_shares(&buckets.irradiance, &summed_irradiance)?;

    Ok(merge_report_rows(MergeInputs {
        summed_generation: &summed_generation,
        generation_deltas: &generation_deltas,
        average_irradiance: &average_irradiance,
        sunshine_shares: &sunshine_shares,
    })?)
}
