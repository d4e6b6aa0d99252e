pub mod bucket_aggregator;
pub mod bucket_reducer;
pub mod hour_normalizer;
pub mod keys;
pub mod readings;
pub mod report_merger;
pub mod site_delta;
pub mod sunshine_share;
