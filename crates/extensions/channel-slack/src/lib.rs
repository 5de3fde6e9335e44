//! # stepgate Channel - Slack
//!
//! Delivers operator messages through a Slack incoming webhook using the
//! legacy "attachments" layout, which renders link buttons without a Slack
//! app.

mod payload;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stepgate_protocols::{ChannelError, NotificationChannel, NotificationMessage};

pub use payload::{SlackAction, SlackAttachment, SlackPayload};

#[cfg(test)]
#[path = "slack_tests.rs"]
mod tests;

/// Slack webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming webhook URL.
    pub webhook_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    10
}

impl SlackConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Slack incoming-webhook channel.
pub struct SlackChannel {
    config: SlackConfig,
    client: Client,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn post(&self, payload: &SlackPayload) -> Result<(), ChannelError> {
        let json = serde_json::to_string(payload)
            .map_err(|e| ChannelError::InvalidPayload(e.to_string()))?;
        debug!("Sending message to Slack '{}'", json);

        let response = self
            .client
            .post(&self.config.webhook_url)
            .header("Content-Type", "application/json")
            .body(json)
            .send()
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SlackChannel {
    fn id(&self) -> &str {
        "slack"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), ChannelError> {
        self.post(&SlackPayload::from(message)).await
    }
}
