//! Application configuration structures

use darah_common::DatasetKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Remote sources and the local data directory
    #[validate(nested)]
    pub data: DataConfig,

    /// Telegram delivery settings
    #[validate(nested)]
    pub telegram: TelegramConfig,

    /// Report output settings
    #[validate(nested)]
    pub report: ReportConfig,

    /// Chart rendering settings
    #[validate(nested)]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingSettings,
}

/// Dataset download configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Directory the downloaded files are written to
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub data_dir: String,

    /// Files downloaded on every run, in order
    pub sources: Vec<SourceConfig>,

    /// HTTP request timeout for downloads in seconds
    #[validate(range(min = 1, max = 600, message = "Download timeout must be between 1 and 600 seconds"))]
    pub request_timeout_seconds: u64,

    /// Skip the run when the upstream repository has no new commit
    pub check_updates: bool,

    /// GitHub commits endpoint of the upstream repository
    #[validate(url(message = "Upstream commits URL must be a valid URL"))]
    pub upstream_commits_url: String,

    /// File (inside `data_dir`) holding the last seen upstream commit hash
    #[validate(length(min = 1, message = "Upstream hash file name cannot be empty"))]
    pub upstream_hash_file: String,
}

/// One remote file to download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Which table this file holds
    pub kind: DatasetKind,

    /// Remote location
    #[validate(url(message = "Source URL must be a valid URL"))]
    pub url: String,

    /// Local file name; defaults to the last path segment of `url`
    pub file_name: Option<String>,
}

impl SourceConfig {
    pub fn new(kind: DatasetKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// File name the source is stored under inside the data directory
    pub fn local_file_name(&self) -> String {
        match &self.file_name {
            Some(name) => name.clone(),
            None => self
                .url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token as issued by BotFather; empty until provided
    #[validate(custom(function = "crate::validation::validate_bot_token", message = "Invalid Telegram bot token format"))]
    pub bot_token: String,

    /// Destination chat: numeric id or `@channelname`; empty until provided
    #[validate(custom(function = "crate::validation::validate_chat_id", message = "Invalid Telegram chat id"))]
    pub chat_id: String,

    /// Bot API base URL
    #[validate(url(message = "Telegram API URL must be a valid URL"))]
    pub api_url: String,

    /// Pause between consecutive messages in milliseconds
    #[validate(range(max = 60000, message = "Send delay cannot exceed 60000 ms"))]
    pub send_delay_ms: u64,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,
}

/// Where rendered charts end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// PNG files in the plot directory
    Directory,
    /// In-memory PNG buffers handed straight to the notifier
    Memory,
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" | "file" => Ok(Self::Directory),
            "memory" | "mem" | "buffer" => Ok(Self::Memory),
            other => Err(format!("unknown output mode '{}'", other)),
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory rendered charts are written to in `directory` mode
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub plot_dir: String,

    /// Output mode for rendered charts
    pub output_mode: OutputMode,

    /// IANA timezone the report date is taken in
    #[validate(custom(function = "crate::validation::validate_timezone", message = "Unknown IANA timezone"))]
    pub timezone: String,

    /// Country name used in the summary message
    #[validate(length(min = 1, message = "Country name cannot be empty"))]
    pub country: String,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Single chart width in pixels
    #[validate(range(min = 200, max = 4000, message = "Width must be between 200 and 4000 pixels"))]
    pub width: u32,

    /// Single chart height in pixels
    #[validate(range(min = 200, max = 4000, message = "Height must be between 200 and 4000 pixels"))]
    pub height: u32,

    /// Side length of a 2x2 state grid image in pixels
    #[validate(range(min = 400, max = 4000, message = "Grid size must be between 400 and 4000 pixels"))]
    pub grid_size: u32,

    /// Background color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Background color must be a hex color"))]
    pub background_color: String,

    /// Scatter point color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Point color must be a hex color"))]
    pub point_color: String,

    /// Regression line color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Regression color must be a hex color"))]
    pub regression_color: String,

    /// Retention area color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Retention color must be a hex color"))]
    pub retention_color: String,

    /// Single-donor area color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Single donor color must be a hex color"))]
    pub single_donor_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Whether to draw grid lines
    pub show_grid: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be a level (trace, debug, info, warn, error) or target=level directives"))]
    pub level: String,

    /// Line format: pretty, compact or json
    #[validate(custom(function = "crate::validation::validate_log_format", message = "Log format must be one of: pretty, compact, json"))]
    pub format: String,

    /// Optional log file path
    pub file: Option<String>,
}

impl Config {
    /// Validation of the entire configuration, including every source entry
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        for source in &self.data.sources {
            source.validate()?;
        }
        crate::validation::validate_sources(&self.data.sources)?;
        Ok(())
    }

    /// Bot token and chat id, both required before anything is sent
    pub fn telegram_credentials(&self) -> darah_common::Result<(&str, &str)> {
        let token = self.telegram.bot_token.trim();
        if token.is_empty() {
            return Err(darah_common::DarahError::validation_field(
                "Telegram bot token is not set",
                "BOT_TOKEN",
            ));
        }
        let chat_id = self.telegram.chat_id.trim();
        if chat_id.is_empty() {
            return Err(darah_common::DarahError::validation_field(
                "Telegram chat id is not set",
                "CHAT_ID",
            ));
        }
        Ok((token, chat_id))
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.data_dir)
    }

    pub fn plot_dir(&self) -> PathBuf {
        PathBuf::from(&self.report.plot_dir)
    }

    /// The configured source for a dataset, if any
    pub fn source(&self, kind: DatasetKind) -> Option<&SourceConfig> {
        self.data.sources.iter().find(|s| s.kind == kind)
    }
}

impl LoggingSettings {
    /// Convert to the runtime logging configuration
    pub fn to_logging_config(&self) -> darah_common::LoggingConfig {
        darah_common::LoggingConfig {
            level: self.level.clone(),
            format: darah_common::LogFormat::from_name(&self.format)
                .unwrap_or(darah_common::LogFormat::Compact),
            file_path: self.file.clone(),
            ..darah_common::LoggingConfig::default()
        }
    }
}
