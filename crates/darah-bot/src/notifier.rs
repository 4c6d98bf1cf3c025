//! Posts the report: one summary message, then every chart in order

use crate::error::{BotError, BotResult};
use crate::telegram::{ChatSender, Photo};
use chrono::NaiveDate;
use darah_common::{format_report_date, ChartArtifact};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Opening message of a report, e.g. `Malaysia's blood donation statistics for 05-03-2024`
pub fn summary_text(country: &str, date: NaiveDate) -> String {
    format!(
        "{}'s blood donation statistics for {}",
        country,
        format_report_date(date)
    )
}

pub struct Notifier {
    sender: Box<dyn ChatSender>,
    delay: Duration,
}

impl Notifier {
    pub fn new(sender: Box<dyn ChatSender>, delay: Duration) -> Self {
        Self { sender, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Send the summary, then each chart with `delay` between consecutive
    /// messages. Stops at the first failure. Returns the number of charts sent.
    #[instrument(skip_all, fields(charts = charts.len()))]
    pub async fn send_report(&self, summary: &str, charts: &[ChartArtifact]) -> BotResult<usize> {
        self.sender.send_text(summary.to_string()).await?;
        info!("Sent summary message");

        for (index, chart) in charts.iter().enumerate() {
            tokio::time::sleep(self.delay).await;

            let photo = Photo::from_artifact(chart)?;
            self.sender
                .send_photo(photo)
                .await
                .map_err(|source| BotError::Send {
                    index,
                    file_name: chart.file_name.clone(),
                    source,
                })?;
            debug!(index, file = %chart.file_name, "Sent chart");
        }

        info!(sent = charts.len(), "Report delivered");
        Ok(charts.len())
    }
}
