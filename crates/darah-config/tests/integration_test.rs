//! Integration tests for darah-config crate.

use darah_common::DatasetKind;
use darah_config::{Config, ConfigError, ConfigLoader, OutputMode};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_full_yaml_round_trip() {
    let yaml = r##"
data:
  data_dir: "/var/lib/darah/data"
  request_timeout_seconds: 30
  check_updates: true
telegram:
  bot_token: "123456789:AAFakeTokenForTests"
  chat_id: "-1001234567890"
  send_delay_ms: 1000
report:
  plot_dir: "/var/lib/darah/plots"
  output_mode: memory
  timezone: "Asia/Kuching"
graph:
  width: 1280
  height: 720
  point_color: "#2CA02C"
logging:
  level: "debug"
  format: "json"
"##;
    let file = write_yaml(yaml);
    let content = std::fs::read_to_string(file.path()).unwrap();
    let mut config: Config = serde_yaml::from_str(&content).unwrap();
    ConfigLoader::apply_overrides_from(&mut config, |_| None).unwrap();
    config.validate_all().unwrap();

    assert_eq!(config.data_dir(), std::path::PathBuf::from("/var/lib/darah/data"));
    assert!(config.data.check_updates);
    assert_eq!(config.report.output_mode, OutputMode::Memory);
    assert_eq!(config.graph.point_color, "#2CA02C");
    assert_eq!(config.telegram_credentials().unwrap().1, "-1001234567890");
    assert_eq!(config.logging.to_logging_config().format, darah_common::LogFormat::Json);

    // Sources were not listed, so the defaults apply
    let retention = config.source(DatasetKind::Retention).unwrap();
    assert_eq!(retention.local_file_name(), "blood_donation_retention.parquet");
}

#[test]
fn test_custom_sources_replace_defaults() {
    let yaml = r#"
data:
  sources:
    - kind: donations_facility
      url: "https://mirror.example.org/darah/donations_facility.csv"
    - kind: donations_state
      url: "https://mirror.example.org/darah/donations_state.csv"
    - kind: new_donors_facility
      url: "https://mirror.example.org/darah/newdonors_facility.csv"
    - kind: new_donors_state
      url: "https://mirror.example.org/darah/newdonors_state.csv"
    - kind: retention
      url: "https://mirror.example.org/darah/retention.parquet"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate_all().unwrap();
    assert_eq!(
        config.source(DatasetKind::NewDonorsState).unwrap().local_file_name(),
        "newdonors_state.csv"
    );
}

#[test]
fn test_rejects_invalid_timezone() {
    let file = write_yaml("report:\n  timezone: \"Mars/Olympus_Mons\"\n");
    let result = ConfigLoader::load_config(file.path());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_rejects_missing_source() {
    let yaml = r#"
data:
  sources:
    - kind: donations_state
      url: "https://mirror.example.org/darah/donations_state.csv"
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert!(config.validate_all().is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::load_config(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}
