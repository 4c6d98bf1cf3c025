//! Chat transport: the [`ChatSender`] seam and its Telegram Bot API client

use async_trait::async_trait;
use darah_common::{ChartArtifact, DarahError, Result};
use darah_config::Config;
use darah_data::http_client;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

/// A chart ready to be posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub caption: String,
    pub png: Vec<u8>,
}

impl Photo {
    /// Read the artifact's image; the caption is its file name without extension
    pub fn from_artifact(artifact: &ChartArtifact) -> std::io::Result<Self> {
        Ok(Self {
            file_name: artifact.file_name.clone(),
            caption: artifact.caption().to_string(),
            png: artifact.png_bytes()?,
        })
    }
}

/// Delivers messages to the configured chat
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSender: Send + Sync {
    /// Post a plain text message
    async fn send_text(&self, text: String) -> Result<()>;

    /// Post a PNG image with a caption
    async fn send_photo(&self, photo: Photo) -> Result<()>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
}

/// Bot API client bound to one bot token and one chat
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(client: Client, api_url: &str, token: &str, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            chat_id: chat_id.into(),
        }
    }

    /// Build from the telegram section; fails when the token or chat id is unset
    pub fn from_config(config: &Config) -> Result<Self> {
        let (token, chat_id) = config.telegram_credentials()?;
        let client = http_client(config.telegram.request_timeout_seconds)?;
        Ok(Self::new(client, &config.telegram.api_url, token, chat_id))
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Turn an HTTP response into `Ok(())` or the API's own error
    async fn check_response(response: reqwest::Response, method: &str) -> Result<()> {
        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(api) if api.ok => Ok(()),
            Ok(api) => Err(DarahError::telegram_with_code(
                api.description
                    .unwrap_or_else(|| format!("{} failed", method)),
                api.error_code.unwrap_or_else(|| status.as_u16()),
            )),
            Err(_) if !status.is_success() => Err(DarahError::telegram_with_code(
                format!("{} returned HTTP {}", method, status),
                status.as_u16(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

// The base URL embeds the bot token
impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// reqwest errors carry the request URL, which contains the token
fn request_error(e: reqwest::Error) -> DarahError {
    DarahError::network_with_source("Telegram request failed", e.without_url())
}

#[async_trait]
impl ChatSender for TelegramClient {
    #[instrument(skip(self, text), fields(chat = %self.chat_id))]
    async fn send_text(&self, text: String) -> Result<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: &text,
            })
            .send()
            .await
            .map_err(request_error)?;

        Self::check_response(response, "sendMessage").await?;
        debug!("Sent text message");
        Ok(())
    }

    #[instrument(skip(self, photo), fields(chat = %self.chat_id, file = %photo.file_name))]
    async fn send_photo(&self, photo: Photo) -> Result<()> {
        let size = photo.png.len();
        let part = Part::bytes(photo.png)
            .file_name(photo.file_name)
            .mime_str("image/png")
            .map_err(request_error)?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", photo.caption)
            .part("photo", part);

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        Self::check_response(response, "sendPhoto").await?;
        debug!(bytes = size, "Sent photo");
        Ok(())
    }
}

/// Logs what would have been sent
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunSender;

#[async_trait]
impl ChatSender for DryRunSender {
    async fn send_text(&self, text: String) -> Result<()> {
        info!(%text, "Dry run: text message");
        Ok(())
    }

    async fn send_photo(&self, photo: Photo) -> Result<()> {
        info!(file = %photo.file_name, caption = %photo.caption, bytes = photo.png.len(), "Dry run: photo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darah_common::test_utils::http_fixtures::serve_responses;
    use darah_common::ChartImage;

    fn client(base: &str) -> TelegramClient {
        TelegramClient::new(Client::new(), base, "123456:ABC-DEF", "-1001")
    }

    #[test]
    fn test_method_url_trims_slash() {
        let telegram = client("https://api.telegram.org/");
        assert_eq!(
            telegram.method_url("sendMessage"),
            "https://api.telegram.org/bot123456:ABC-DEF/sendMessage"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let telegram = client("https://api.telegram.org");
        let debug = format!("{:?}", telegram);
        assert!(debug.contains("-1001"));
        assert!(!debug.contains("ABC-DEF"));
    }

    #[test]
    fn test_photo_from_artifact() {
        let artifact = ChartArtifact::new(
            "Total Annual Blood Donations.png",
            ChartImage::Png(vec![1, 2, 3]),
        );
        let photo = Photo::from_artifact(&artifact).unwrap();
        assert_eq!(photo.caption, "Total Annual Blood Donations");
        assert_eq!(photo.file_name, "Total Annual Blood Donations.png");
        assert_eq!(photo.png, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = Config::default();
        assert!(TelegramClient::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_send_text_posts_json() {
        let (base, server) = serve_responses(vec![(200, r#"{"ok":true,"result":{}}"#.to_string())]).await;

        client(&base).send_text("hello".to_string()).await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/bot123456:ABC-DEF/sendMessage");
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["chat_id"], "-1001");
        assert_eq!(body["text"], "hello");
    }

    #[tokio::test]
    async fn test_api_error_carries_code() {
        let (base, _server) = serve_responses(vec![(
            400,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#.to_string(),
        )])
        .await;

        let err = client(&base).send_text("hello".to_string()).await.unwrap_err();
        match err {
            DarahError::Telegram { message, error_code, .. } => {
                assert_eq!(message, "Bad Request: chat not found");
                assert_eq!(error_code, Some(400));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_uses_status() {
        let (base, _server) = serve_responses(vec![(502, "bad gateway".to_string())]).await;

        let err = client(&base).send_text("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, DarahError::Telegram { error_code: Some(502), .. }));
    }

    #[tokio::test]
    async fn test_dry_run_accepts_everything() {
        let sender = DryRunSender;
        sender.send_text("summary".to_string()).await.unwrap();
        sender
            .send_photo(Photo {
                file_name: "a.png".to_string(),
                caption: "a".to_string(),
                png: Vec::new(),
            })
            .await
            .unwrap();
    }
}
