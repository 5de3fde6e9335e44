//! Workflow engine protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;
use crate::execution::ExecutionRecord;
use crate::identity::StateMachineId;

/// Error code and cause reported when a wait-point is failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub error: String,
    pub cause: String,
}

impl TaskFailure {
    pub fn new(error: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            cause: cause.into(),
        }
    }
}

/// External workflow engine holding suspended executions.
///
/// Tokens are single-use: once a success or failure signal has been
/// accepted, any further signal for the same token must fail with
/// [`EngineError::InvalidToken`].
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Engine identifier (for logs).
    fn id(&self) -> &str;

    /// Resume the wait-point identified by `token` with `output`.
    async fn send_task_success(&self, token: &str, output: &Value) -> Result<(), EngineError>;

    /// Fail the wait-point identified by `token`.
    async fn send_task_failure(&self, token: &str, failure: &TaskFailure)
    -> Result<(), EngineError>;

    /// List up to `max_results` most recent executions of `state_machine`.
    async fn list_executions(
        &self,
        state_machine: &StateMachineId,
        max_results: u32,
    ) -> Result<Vec<ExecutionRecord>, EngineError>;
}
