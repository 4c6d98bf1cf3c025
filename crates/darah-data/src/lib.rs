//! # Darah Data
//!
//! Downloads the public blood donation datasets, loads them into typed
//! records and derives the yearly series the report charts.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod fetcher;
pub mod loader;
pub mod upstream;

pub use aggregator::{
    annual_totals, daily_averages, per_state, regions_in_order, retention_rates, state_names,
    ReportSeries, RetentionPoint, StateSeries,
};
pub use fetcher::{http_client, DatasetFetcher};
pub use loader::{load_daily_counts, load_retention, SourceDatasets};
pub use upstream::{UpstreamChecker, UpstreamStatus};
