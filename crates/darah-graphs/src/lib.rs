//! # Darah Graphs
//!
//! Chart construction and rendering for Darah Report.
//!
//! Yearly series become scatter plots with least-squares trend lines, state
//! series are paged into 2x2 grids, and the retention series becomes a
//! stacked area chart. Images are written to a directory or kept in memory.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod axis;
pub mod chart;
pub mod layout;
pub mod regression;
pub mod renderer;
pub mod report;
pub mod retention;
pub mod style;
pub mod ticks;
pub mod trend;

pub use axis::FixedTicks;
pub use chart::{ReportChart, StateGrid};
pub use layout::{chunk_states, STATES_PER_GRID};
pub use regression::LinearFit;
pub use renderer::{encode_png, ChartRenderer, OutputTarget};
pub use report::{render_report, report_charts};
pub use style::{parse_color, ChartStyle};
pub use ticks::{leading_digit_tick, series_tick, tick_values};
pub use trend::{Metric, TrendPanel};
