//! Default values for every configuration section.

use crate::schema::*;
use darah_common::DatasetKind;

/// Base URL of the raw upstream CSV files
pub const UPSTREAM_RAW_BASE: &str =
    "https://raw.githubusercontent.com/MoH-Malaysia/data-darah-public/main";

/// Commits endpoint polled by the update check
pub const UPSTREAM_COMMITS_URL: &str =
    "https://api.github.com/repos/MoH-Malaysia/data-darah-public/commits";

/// Granular retention dataset
pub const RETENTION_URL: &str =
    "https://storage.data.gov.my/healthcare/blood_donation_retention_2024.parquet";

/// Local name of the retention dataset
pub const RETENTION_FILE_NAME: &str = "blood_donation_retention.parquet";

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            telegram: TelegramConfig::default(),
            report: ReportConfig::default(),
            graph: GraphConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            sources: default_sources(),
            request_timeout_seconds: 60,
            check_updates: false,
            upstream_commits_url: UPSTREAM_COMMITS_URL.to_string(),
            upstream_hash_file: "upstream-hash.txt".to_string(),
        }
    }
}

/// The four upstream CSV tables followed by the retention Parquet file
pub fn default_sources() -> Vec<SourceConfig> {
    let csv = |kind: DatasetKind| {
        SourceConfig::new(kind, format!("{}/{}.csv", UPSTREAM_RAW_BASE, kind.as_str()))
    };

    vec![
        csv(DatasetKind::DonationsFacility),
        csv(DatasetKind::DonationsState),
        csv(DatasetKind::NewDonorsFacility),
        csv(DatasetKind::NewDonorsState),
        SourceConfig::new(DatasetKind::Retention, RETENTION_URL).with_file_name(RETENTION_FILE_NAME),
    ]
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_url: TELEGRAM_API_URL.to_string(),
            send_delay_ms: 3000,
            request_timeout_seconds: 60,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            plot_dir: "./plots".to_string(),
            output_mode: OutputMode::Directory,
            timezone: "Asia/Kuala_Lumpur".to_string(),
            country: "Malaysia".to_string(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
            grid_size: 1000,
            background_color: "#FFFFFF".to_string(),
            point_color: "#1F77B4".to_string(),
            regression_color: "#FF0000".to_string(),
            retention_color: "#1F77B4".to_string(),
            single_donor_color: "#FF7F0E".to_string(),
            font_family: "sans-serif".to_string(),
            show_grid: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            file: None,
        }
    }
}
