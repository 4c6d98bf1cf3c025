//! # Darah Common
//!
//! Shared records, error type, logging bootstrap and formatting helpers for
//! Darah Report.
//!
//! This crate provides the foundational types used across all other crates
//! in the workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{DarahError, Result};
pub use logging::{init_logging, is_valid_filter, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
