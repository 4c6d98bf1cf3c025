//! One report run: upstream check, fetch, aggregate, render, notify

use crate::error::BotResult;
use crate::notifier::{summary_text, Notifier};
use crate::telegram::{ChatSender, DryRunSender, TelegramClient};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use darah_common::{local_date, DarahError};
use darah_config::Config;
use darah_data::{DatasetFetcher, ReportSeries, SourceDatasets, UpstreamChecker, UpstreamStatus};
use darah_graphs::{render_report, ChartRenderer};
use std::time::Duration;
use tracing::{info, instrument};

/// Switches that change a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Use the files already in the data directory
    pub skip_fetch: bool,
    /// Skip the run when the upstream repository has not changed
    pub check_updates: bool,
    /// Log messages instead of sending them
    pub dry_run: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing new upstream since the recorded hash
    UpToDate { hash: String },
    /// The report went out with this many charts
    Delivered { charts: usize },
}

pub struct Pipeline {
    config: Config,
    notifier: Notifier,
}

impl Pipeline {
    pub fn new(config: Config, sender: Box<dyn ChatSender>) -> Self {
        let delay = Duration::from_millis(config.telegram.send_delay_ms);
        Self {
            config,
            notifier: Notifier::new(sender, delay),
        }
    }

    /// Pick the sender for `options`; a real run needs Telegram credentials
    pub fn from_config(config: Config, options: &RunOptions) -> BotResult<Self> {
        let sender: Box<dyn ChatSender> = if options.dry_run {
            Box::new(DryRunSender)
        } else {
            Box::new(TelegramClient::from_config(&config)?)
        };
        Ok(Self::new(config, sender))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Today's date in the report timezone
    pub fn report_date(&self) -> BotResult<NaiveDate> {
        let tz: Tz = self.config.report.timezone.parse().map_err(|_| {
            DarahError::config(format!("Unknown timezone '{}'", self.config.report.timezone))
        })?;
        Ok(local_date(Utc::now(), tz))
    }

    #[instrument(skip(self))]
    pub async fn run(&self, options: &RunOptions) -> BotResult<RunOutcome> {
        let config = &self.config;

        // Hash to record once the report is out
        let mut pending = None;
        if options.check_updates || config.data.check_updates {
            let checker = UpstreamChecker::from_config(config)?;
            let status = checker.check().await?;
            match status {
                UpstreamStatus::Unchanged(hash) => {
                    info!(%hash, "No new upstream data, skipping report");
                    return Ok(RunOutcome::UpToDate { hash });
                }
                UpstreamStatus::Changed { latest, .. } => pending = Some((checker, latest)),
            }
        }

        if options.skip_fetch {
            info!(dir = %config.data_dir().display(), "Using previously downloaded files");
        } else {
            DatasetFetcher::from_config(config)?
                .fetch_all(&config.data.sources)
                .await?;
        }

        let datasets = SourceDatasets::load(&config.data_dir(), &config.data.sources)?;
        let series = ReportSeries::from_datasets(&datasets);

        let renderer = ChartRenderer::from_config(config);
        let charts = render_report(&renderer, &series)?;
        info!(charts = charts.len(), "Rendered report charts");

        let summary = summary_text(&config.report.country, self.report_date()?);
        let sent = self.notifier.send_report(&summary, &charts).await?;

        if let Some((checker, latest)) = pending {
            checker.record(&latest)?;
        }

        Ok(RunOutcome::Delivered { charts: sent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::telegram::MockChatSender;
    use darah_common::test_utils::http_fixtures::serve_responses;

    fn config_in(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.data.data_dir = dir.to_string_lossy().into_owned();
        config.report.plot_dir = dir.join("plots").to_string_lossy().into_owned();
        config.telegram.send_delay_ms = 0;
        config
    }

    #[test]
    fn test_real_run_needs_credentials() {
        let result = Pipeline::from_config(Config::default(), &RunOptions::default());
        assert!(matches!(
            result,
            Err(BotError::Stage(DarahError::Validation { .. }))
        ));
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };
        assert!(Pipeline::from_config(Config::default(), &options).is_ok());
    }

    #[test]
    fn test_report_date_rejects_unknown_timezone() {
        let mut config = Config::default();
        config.report.timezone = "Mars/Olympus".to_string();
        let pipeline = Pipeline::new(config, Box::new(MockChatSender::new()));
        assert!(pipeline.report_date().is_err());
    }

    #[tokio::test]
    async fn test_unchanged_upstream_skips_everything() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("upstream-hash.txt"), "abc123\n").unwrap();
        let (base, _server) = serve_responses(vec![(200, r#"[{"sha":"abc123"}]"#.to_string())]).await;

        let mut config = config_in(dir.path());
        config.data.upstream_commits_url = format!("{}/commits", base);

        let mut sender = MockChatSender::new();
        sender.expect_send_text().never();
        sender.expect_send_photo().never();

        let pipeline = Pipeline::new(config, Box::new(sender));
        let options = RunOptions {
            check_updates: true,
            ..RunOptions::default()
        };
        let outcome = pipeline.run(&options).await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::UpToDate {
                hash: "abc123".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_run_can_be_retriggered() {
        let dir = tempfile::tempdir().unwrap();
        let hash_path = dir.path().join("upstream-hash.txt");
        std::fs::write(&hash_path, "old").unwrap();
        let (base, _server) = serve_responses(vec![
            (200, r#"[{"sha":"new1"}]"#.to_string()),
            (200, r#"[{"sha":"new1"}]"#.to_string()),
        ])
        .await;

        let mut config = config_in(dir.path());
        config.data.upstream_commits_url = format!("{}/commits", base);

        let mut sender = MockChatSender::new();
        sender.expect_send_text().never();
        sender.expect_send_photo().never();

        let pipeline = Pipeline::new(config, Box::new(sender));
        let options = RunOptions {
            check_updates: true,
            skip_fetch: true,
            ..RunOptions::default()
        };

        // No input files in the data directory, so both runs fail after the check
        assert!(pipeline.run(&options).await.is_err());
        assert_eq!(std::fs::read_to_string(&hash_path).unwrap(), "old");

        let retry = pipeline.run(&options).await;
        assert!(
            !matches!(retry, Ok(RunOutcome::UpToDate { .. })),
            "a failed run must not mark upstream data as handled"
        );
        assert_eq!(std::fs::read_to_string(&hash_path).unwrap(), "old");
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_sending() {
        let dir = tempfile::tempdir().unwrap();

        let mut sender = MockChatSender::new();
        sender.expect_send_text().never();
        sender.expect_send_photo().never();

        let pipeline = Pipeline::new(config_in(dir.path()), Box::new(sender));
        let options = RunOptions {
            skip_fetch: true,
            ..RunOptions::default()
        };
        assert!(pipeline.run(&options).await.is_err());
    }
}
