//! Configuration loading utilities

use crate::{Config, OutputMode};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "DARAH_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for darah_common::DarahError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        darah_common::DarahError::config_with_source(message, err)
    }
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvParseError {
        var: var.to_string(),
        source: e.into(),
    })
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!(path = %path.as_ref().display(), "Reading configuration file");
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from the first file found, or from defaults.
    ///
    /// Lookup order: `explicit`, then `DARAH_CONFIG_PATH`, then `config.yaml`
    /// and `config.yml` in the working directory.
    pub fn load(explicit: Option<&Path>) -> darah_common::Result<Config> {
        if let Some(path) = explicit {
            info!(path = %path.display(), "Loading configuration");
            return Ok(Self::load_config(path)?);
        }

        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            info!(path = %config_path, "Loading configuration from {}", CONFIG_PATH_ENV);
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            info!("No configuration file found, using defaults and environment");
            Self::load_from_env()?
        };

        Ok(config)
    }

    /// Defaults plus environment overrides, validated
    pub fn load_from_env() -> Result<Config, ConfigError> {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply overrides read through `lookup`; a missing variable leaves the field untouched
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Telegram
        if let Some(token) = lookup("BOT_TOKEN") {
            config.telegram.bot_token = token.trim().to_string();
        }

        if let Some(chat_id) = lookup("CHAT_ID") {
            config.telegram.chat_id = chat_id.trim().to_string();
        }

        if let Some(url) = lookup("TELEGRAM_API_URL") {
            config.telegram.api_url = url;
        }

        if let Some(delay) = lookup("SEND_DELAY_MS") {
            config.telegram.send_delay_ms = parse_env("SEND_DELAY_MS", &delay)?;
        }

        // Data
        if let Some(path) = lookup("DATA_PATH") {
            config.data.data_dir = path;
        }

        if let Some(check) = lookup("CHECK_UPDATES") {
            config.data.check_updates = parse_env("CHECK_UPDATES", &check)?;
        }

        // Report
        if let Some(path) = lookup("PLOT_PATH") {
            config.report.plot_dir = path;
        }

        if let Some(mode) = lookup("OUTPUT_MODE") {
            config.report.output_mode = parse_env::<OutputMode>("OUTPUT_MODE", &mode)?;
        }

        if let Some(timezone) = lookup("REPORT_TIMEZONE") {
            config.report.timezone = timezone;
        }

        // Graph
        if let Some(width) = lookup("GRAPH_WIDTH") {
            config.graph.width = parse_env("GRAPH_WIDTH", &width)?;
        }

        if let Some(height) = lookup("GRAPH_HEIGHT") {
            config.graph.height = parse_env("GRAPH_HEIGHT", &height)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}
