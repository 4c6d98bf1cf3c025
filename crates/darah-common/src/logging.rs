//! Structured logging infrastructure for Darah Report

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output style of the console/file log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored output for interactive runs
    Pretty,
    /// Single-line compact output, suited to cron mail and log files
    Compact,
    /// Newline-delimited JSON
    Json,
}

impl LogFormat {
    /// Parse a format name as used in configuration files
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "darah_data=trace")
    pub level: String,
    /// Line format
    pub format: LogFormat,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include span open/close events in the output
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Whether `directives` is a usable `EnvFilter` string: a level such as
/// `info`, or comma separated `target=level` directives
pub fn is_valid_filter(directives: &str) -> bool {
    !directives.trim().is_empty() && EnvFilter::try_new(directives).is_ok()
}

/// Initialize the tracing subscriber with the given configuration
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_new(&config.level)?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match (config.format, config.file_path) {
        (LogFormat::Json, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(Mutex::new(file));
            registry.with(layer).try_init()?;
        }
        (LogFormat::Json, None) => {
            let layer = fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Pretty, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(Mutex::new(file));
            registry.with(layer).try_init()?;
        }
        (LogFormat::Pretty, None) => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            registry.with(layer).try_init()?;
        }
        (LogFormat::Compact, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .compact()
                .with_ansi(false)
                .with_span_events(span_events)
                .with_target(config.include_targets)
                .with_writer(Mutex::new(file));
            registry.with(layer).try_init()?;
        }
        (LogFormat::Compact, None) => {
            let layer = fmt::layer()
                .compact()
                .with_span_events(span_events)
                .with_target(config.include_targets);
            registry.with(layer).try_init()?;
        }
    }

    Ok(())
}
