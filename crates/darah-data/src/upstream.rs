//! Skips runs when the upstream repository has not moved since the last one

use darah_common::{DarahError, Result};
use darah_config::Config;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Outcome of comparing the upstream head with the stored hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamStatus {
    /// New commit, or no hash stored yet
    Changed {
        previous: Option<String>,
        latest: String,
    },
    /// Same commit as the last recorded run
    Unchanged(String),
}

impl UpstreamStatus {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

#[derive(Debug, Deserialize)]
struct CommitSummary {
    sha: String,
}

/// Compares the latest upstream commit with the hash stored in a flat file
#[derive(Debug, Clone)]
pub struct UpstreamChecker {
    client: Client,
    commits_url: String,
    hash_path: PathBuf,
}

impl UpstreamChecker {
    pub fn new(client: Client, commits_url: impl Into<String>, hash_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            commits_url: commits_url.into(),
            hash_path: hash_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = crate::fetcher::http_client(config.data.request_timeout_seconds)?;
        Ok(Self::new(
            client,
            config.data.upstream_commits_url.clone(),
            config.data_dir().join(&config.data.upstream_hash_file),
        ))
    }

    /// Hash of the newest commit reported by the commits endpoint
    pub async fn latest_commit(&self) -> Result<String> {
        let commits: Vec<CommitSummary> = self
            .client
            .get(&self.commits_url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        commits
            .into_iter()
            .next()
            .map(|c| c.sha)
            .ok_or_else(|| DarahError::data("Upstream commit list is empty"))
    }

    /// Compare the latest upstream hash with the stored one. Nothing is
    /// written; call [`UpstreamChecker::record`] once the run has succeeded.
    #[instrument(skip(self), fields(url = %self.commits_url))]
    pub async fn check(&self) -> Result<UpstreamStatus> {
        let latest = self.latest_commit().await?;
        let previous = read_stored_hash(&self.hash_path)?;

        if previous.as_deref() == Some(latest.as_str()) {
            info!(hash = %latest, "Upstream data unchanged");
            return Ok(UpstreamStatus::Unchanged(latest));
        }

        info!(previous = ?previous, latest = %latest, "Upstream data changed");
        Ok(UpstreamStatus::Changed { previous, latest })
    }

    /// Remember `hash` as the last upstream state a report went out for
    pub fn record(&self, hash: &str) -> Result<()> {
        store_hash(&self.hash_path, hash)?;
        debug!(path = %self.hash_path.display(), %hash, "Recorded upstream hash");
        Ok(())
    }
}

/// Stored hash, or `None` when the file is missing or blank
pub fn read_stored_hash(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let hash = content.trim();
            Ok((!hash.is_empty()).then(|| hash.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No stored upstream hash");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn store_hash(path: &Path, hash: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, hash)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use darah_common::test_utils::{create_temp_dir, http_fixtures::serve_responses};

    const COMMITS: &str = r#"[{"sha":"9f2c1e0","commit":{"message":"daily update"}},{"sha":"77ab001"}]"#;

    #[test]
    fn test_read_stored_hash_missing_and_blank() {
        let dir = create_temp_dir();
        let path = dir.path().join("upstream-hash.txt");
        assert_eq!(read_stored_hash(&path).unwrap(), None);

        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(read_stored_hash(&path).unwrap(), None);

        std::fs::write(&path, "abc123\n").unwrap();
        assert_eq!(read_stored_hash(&path).unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_check_leaves_stored_hash_alone() {
        let (url, _handle) = serve_responses(vec![(200, COMMITS.to_string())]).await;
        let dir = create_temp_dir();
        let hash_path = dir.path().join("state/upstream-hash.txt");
        let checker = UpstreamChecker::new(Client::new(), format!("{url}/commits"), &hash_path);

        let status = checker.check().await.unwrap();
        assert_eq!(
            status,
            UpstreamStatus::Changed {
                previous: None,
                latest: "9f2c1e0".to_string()
            }
        );
        assert!(!hash_path.exists());

        checker.record("9f2c1e0").unwrap();
        assert_eq!(std::fs::read_to_string(&hash_path).unwrap(), "9f2c1e0");
    }

    #[tokio::test]
    async fn test_same_hash_is_unchanged() {
        let (url, _handle) = serve_responses(vec![(200, COMMITS.to_string())]).await;
        let dir = create_temp_dir();
        let hash_path = dir.path().join("upstream-hash.txt");
        std::fs::write(&hash_path, "9f2c1e0").unwrap();

        let checker = UpstreamChecker::new(Client::new(), format!("{url}/commits"), &hash_path);
        let status = checker.check().await.unwrap();

        assert_eq!(status, UpstreamStatus::Unchanged("9f2c1e0".to_string()));
        assert!(!status.is_changed());
    }

    #[tokio::test]
    async fn test_empty_commit_list_is_error() {
        let (url, _handle) = serve_responses(vec![(200, "[]".to_string())]).await;
        let dir = create_temp_dir();
        let checker = UpstreamChecker::new(Client::new(), url, dir.path().join("hash"));

        let err = checker.check().await.unwrap_err();
        assert!(matches!(err, DarahError::Data { .. }));
    }
}
