//! Notification channel protocol.
//!
//! A channel is a fire-and-forget sink for operator-facing messages. The
//! message model is deliberately small: a title, a few body lines and
//! optional link buttons. Channels translate it into their own wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;

/// Visual style of an action button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    /// Neutral, no emphasis.
    #[default]
    Default,
    /// Affirmative.
    Primary,
    /// Destructive.
    Danger,
}

/// A button that opens a URL when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub name: String,
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub style: ButtonStyle,
}

impl ActionButton {
    pub fn new(name: impl Into<String>, text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            url: url.into(),
            style: ButtonStyle::Default,
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }
}

/// Message delivered to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionButton>,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn with_action(mut self, action: ActionButton) -> Self {
        self.actions.push(action);
        self
    }

    /// Body text, one line per entry.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Outbound notification sink.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Channel identifier (for logs).
    fn id(&self) -> &str;

    /// Deliver one message. Success means the transport accepted it.
    async fn send(&self, message: &NotificationMessage) -> Result<(), ChannelError>;
}
