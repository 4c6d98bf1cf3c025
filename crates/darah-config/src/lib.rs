//! # Darah Config
//!
//! Configuration schema, defaults, loading and validation for Darah Report.
//!
//! Configuration comes from an optional YAML file, then environment
//! variable overrides, and is validated before use.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
