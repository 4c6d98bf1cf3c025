//! Downloads the configured source files into the data directory

use darah_common::{DarahError, Result};
use darah_config::{Config, SourceConfig};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// User agent sent with every request; GitHub rejects anonymous clients
pub const USER_AGENT: &str = concat!("darah-report/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the fetcher and the upstream check
pub fn http_client(timeout_seconds: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DarahError::network_with_source("Failed to create HTTP client", e))
}

/// Downloads every source, in order, overwriting previous copies
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    client: Client,
    data_dir: PathBuf,
}

impl DatasetFetcher {
    pub fn new(client: Client, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http_client(config.data.request_timeout_seconds)?;
        Ok(Self::new(client, config.data_dir()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Download all sources sequentially. The first failure aborts the batch.
    #[instrument(skip(self, sources), fields(count = sources.len()))]
    pub async fn fetch_all(&self, sources: &[SourceConfig]) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let mut paths = Vec::with_capacity(sources.len());
        for source in sources {
            paths.push(self.fetch(source).await?);
        }

        info!(dir = %self.data_dir.display(), "Downloaded {} source files", paths.len());
        Ok(paths)
    }

    /// Download a single source and return the path it was written to
    #[instrument(skip(self, source), fields(kind = %source.kind))]
    pub async fn fetch(&self, source: &SourceConfig) -> Result<PathBuf> {
        let file_name = source.local_file_name();
        if file_name.is_empty() {
            return Err(DarahError::config(format!(
                "Cannot derive a file name for {} from '{}'",
                source.kind, source.url
            )));
        }

        debug!(url = %source.url, "Downloading");
        let response = self.client.get(&source.url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let path = self.data_dir.join(&file_name);
        tokio::fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Saved");

        Ok(path)
    }
}
