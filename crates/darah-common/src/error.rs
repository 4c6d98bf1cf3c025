//! Error types and utilities for Darah Report

use thiserror::Error;

/// Result type alias for Darah Report operations
pub type Result<T> = std::result::Result<T, DarahError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Darah Report operations
#[derive(Error, Debug)]
pub enum DarahError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (dataset downloads, upstream checks)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Telegram Bot API errors
    #[error("Telegram API error: {message}")]
    Telegram {
        message: String,
        error_code: Option<u16>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Errors reading or interpreting a source dataset
    #[error("Data error: {message}")]
    Data {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart rendering and encoding errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for configuration or input values
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl DarahError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new Telegram API error with the error code returned by the API
    pub fn telegram_with_code(msg: impl Into<String>, code: u16) -> Self {
        Self::Telegram {
            message: msg.into(),
            error_code: Some(code),
            source: None,
        }
    }

    /// Create a new data error
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new data error with source
    pub fn data_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Data {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to DarahError
impl From<reqwest::Error> for DarahError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from csv::Error to DarahError
impl From<csv::Error> for DarahError {
    fn from(err: csv::Error) -> Self {
        let message = match err.position() {
            Some(pos) => format!("Malformed CSV record at line {}", pos.line()),
            None => "Malformed CSV input".to_string(),
        };
        Self::data_with_source(message, err)
    }
}

#[cfg(feature = "polars")]
/// Convert from polars errors to DarahError
impl From<polars::prelude::PolarsError> for DarahError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::data_with_source("Parquet processing failed", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DarahError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DarahError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
