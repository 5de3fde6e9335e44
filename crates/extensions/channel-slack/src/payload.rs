//! Slack attachment payload.

use serde::Serialize;
use stepgate_protocols::{ActionButton, ButtonStyle, NotificationMessage};

#[derive(Debug, Serialize)]
pub struct SlackPayload {
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
pub struct SlackAttachment {
    pub title: String,
    pub text: String,
    pub mrkdwn_in: Vec<&'static str>,
    pub fallback: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<SlackAction>,
}

/// A link button.
#[derive(Debug, Serialize)]
pub struct SlackAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub text: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'static str>,
}

impl From<&ActionButton> for SlackAction {
    fn from(button: &ActionButton) -> Self {
        let style = match button.style {
            ButtonStyle::Default => None,
            ButtonStyle::Primary => Some("primary"),
            ButtonStyle::Danger => Some("danger"),
        };
        Self {
            kind: "button",
            name: button.name.clone(),
            text: button.text.clone(),
            url: button.url.clone(),
            style,
        }
    }
}

impl From<&NotificationMessage> for SlackPayload {
    fn from(message: &NotificationMessage) -> Self {
        Self {
            attachments: vec![SlackAttachment {
                title: message.title.clone(),
                text: message.text(),
                mrkdwn_in: vec!["text"],
                fallback: String::new(),
                actions: message.actions.iter().map(SlackAction::from).collect(),
            }],
        }
    }
}
