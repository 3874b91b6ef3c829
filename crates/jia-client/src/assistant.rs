//! HTTP client for the remote extraction/matching assistant.

use crate::error::AssistantError;
use crate::image::CardImage;
use async_trait::async_trait;
use jia_config::AssistantConfig;
use jia_protocol::{CardUploadResponse, ChatRequest, ChatResponse, Customer};
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

/// Chat, card upload, and name search against the assistant service.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Post a free-text chat message.
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, AssistantError>;
    /// Post a prepared card image for extraction and matching.
    async fn upload_card(&self, image: CardImage) -> Result<CardUploadResponse, AssistantError>;
    /// Server-side case-insensitive substring search on customer name.
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, AssistantError>;
}

/// Assistant client over HTTP.
pub struct HttpAssistantClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAssistantClient {
    /// Build a client for the configured assistant endpoint.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| AssistantError::Transport(err.to_string()))?;
        info!(
            "assistant client ready (base_url={}, timeout_secs={})",
            config.base_url, config.timeout_secs
        );
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a full endpoint URL under the configured base.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Read the body of a non-success response into a `Service` error.
    async fn service_error(response: reqwest::Response) -> AssistantError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        AssistantError::Service(
            extract_error_message(&body).unwrap_or_else(|| format!("server error {status}")),
        )
    }
}

#[async_trait]
impl AssistantService for HttpAssistantClient {
    async fn send_chat(&self, message: &str) -> Result<ChatResponse, AssistantError> {
        debug!("sending chat message (len={})", message.len());
        let response = self
            .http
            .post(self.endpoint("/api/chat"))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let parsed: ChatResponse = response.json().await?;
        debug!("chat response received (status={})", parsed.status.as_str());
        Ok(parsed)
    }

    async fn upload_card(&self, image: CardImage) -> Result<CardUploadResponse, AssistantError> {
        info!(
            "uploading card image (file={}, bytes={})",
            image.file_name,
            image.bytes.len()
        );
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime)
            .map_err(|err| AssistantError::Transport(err.to_string()))?;
        let form = Form::new().part("card", part);
        let response = self
            .http
            .post(self.endpoint("/api/upload-card"))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        let parsed: CardUploadResponse = response.json().await?;
        debug!("card response received (status={})", parsed.status.as_str());
        Ok(parsed)
    }

    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, AssistantError> {
        debug!("searching customers (query_len={})", query.len());
        let response = self
            .http
            .get(self.endpoint("/api/customers/search"))
            .query(&[("q", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }
        Ok(response.json().await?)
    }
}

/// Pull a human-readable message out of an error body.
///
/// JSON bodies are checked for `message` then `error`; a non-empty plain
/// body is used as-is.
fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(Value::as_str)
                && !text.trim().is_empty()
            {
                return Some(text.to_string());
            }
        }
        return None;
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
