//! Execution records as reported by the workflow engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ExecutionId;

/// Execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
    PendingRedrive,
    /// A status this build does not know about.
    #[serde(other)]
    Unknown,
}

/// One execution of a state machine. Read-only; owned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub execution_arn: String,
    pub state_machine_arn: String,
    pub name: String,
    pub status: ExecutionStatus,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    pub fn new(execution: &ExecutionId, status: ExecutionStatus, start_date: DateTime<Utc>) -> Self {
        Self {
            execution_arn: execution.arn(),
            state_machine_arn: execution.state_machine.arn(),
            name: execution.name.clone(),
            status,
            start_date,
            stop_date: None,
        }
    }

    pub fn with_stop_date(mut self, stop_date: DateTime<Utc>) -> Self {
        self.stop_date = Some(stop_date);
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == ExecutionStatus::Running
    }
}
