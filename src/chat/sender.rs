use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Posts text messages to the messaging provider's HTTP API
#[derive(Clone)]
pub struct ChatSender {
    pub(crate) client: Client,
    api_url: String,
    token: Option<String>,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: MessageText<'a>,
}

#[derive(Debug, Serialize)]
struct MessageText<'a> {
    body: &'a str,
}

impl ChatSender {
    pub fn new(api_url: String, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url,
            token,
            timeout_secs,
        })
    }

    /// Send `body` as a text message to `to`. Not retried on failure.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let payload = OutgoingMessage {
            to,
            kind: "text",
            text: MessageText { body },
        };

        let mut request = self
            .client
            .post(&self.api_url)
            .header("User-Agent", concat!("licita-kb/", env!("CARGO_PKG_VERSION")))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(format!(
                    "Chat API request timed out after {} seconds",
                    self.timeout_secs
                ))
            } else if e.is_connect() {
                AppError::Network(format!("Failed to connect to chat API: {}", e))
            } else {
                AppError::Network(format!("Chat API request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(to = %to, status = %status, "Chat API rejected message");
            return Err(AppError::Network(format!(
                "Chat API returned non-success status {}: {}",
                status,
                if body.is_empty() { "No response body" } else { &body }
            )));
        }

        info!(to = %to, length = body.len(), "Chat reply delivered");
        Ok(())
    }
}
