//! Operator-facing message composition.

use chrono::{DateTime, Local, TimeZone};
use stepgate_protocols::{ActionButton, ButtonStyle, ExecutionId, NotificationMessage};

use crate::links::DecisionLinks;

/// Status line sent after an approval has been applied.
pub const APPROVED_STATUS: &str = "Manually approved, continuing execution";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp the way messages show it.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time, formatted for a message.
pub fn now() -> String {
    format_timestamp(&Local::now())
}

/// Message asking the operator to approve or reject.
pub fn approval_request(
    execution: &ExecutionId,
    state_name: &str,
    timestamp: &str,
    links: &DecisionLinks,
) -> NotificationMessage {
    base(execution, timestamp, state_name)
        .with_action(
            ActionButton::new("approve", "Approve", links.approve.clone())
                .with_style(ButtonStyle::Primary),
        )
        .with_action(ActionButton::new("reject", "Reject", links.reject.clone()))
}

/// Follow-up after the engine accepted an approval. No buttons.
pub fn approval_confirmation(execution: &ExecutionId, timestamp: &str) -> NotificationMessage {
    base(execution, timestamp, APPROVED_STATUS)
}

fn base(execution: &ExecutionId, timestamp: &str, status: &str) -> NotificationMessage {
    NotificationMessage::new(execution.state_machine_name())
        .with_line(format!("*Execution:* {}", execution.name))
        .with_line(format!("*Time:* {}", timestamp))
        .with_line(format!("*Status:* {}", status))
}
