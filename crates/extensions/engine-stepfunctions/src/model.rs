//! Wire shapes of the Step Functions JSON protocol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stepgate_protocols::{EngineError, ExecutionRecord, ExecutionStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendTaskSuccessInput<'a> {
    pub task_token: &'a str,
    /// JSON document, encoded as a string.
    pub output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendTaskFailureInput<'a> {
    pub task_token: &'a str,
    pub error: &'a str,
    pub cause: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListExecutionsInput {
    pub state_machine_arn: String,
    pub max_results: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListExecutionsOutput {
    #[serde(default)]
    pub executions: Vec<ExecutionListItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecutionListItem {
    pub execution_arn: String,
    pub state_machine_arn: String,
    pub name: String,
    pub status: ExecutionStatus,
    /// Seconds since the epoch, fractional.
    pub start_date: f64,
    #[serde(default)]
    pub stop_date: Option<f64>,
}

impl ExecutionListItem {
    pub fn into_record(self) -> Result<ExecutionRecord, EngineError> {
        let start_date = epoch_to_datetime(self.start_date)?;
        let stop_date = self.stop_date.map(epoch_to_datetime).transpose()?;
        Ok(ExecutionRecord {
            execution_arn: self.execution_arn,
            state_machine_arn: self.state_machine_arn,
            name: self.name,
            status: self.status,
            start_date,
            stop_date,
        })
    }
}

/// `{"__type": "...#Code", "message": "..."}`; some services capitalize
/// `Message`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "__type")]
    pub kind: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

fn epoch_to_datetime(seconds: f64) -> Result<DateTime<Utc>, EngineError> {
    if !seconds.is_finite() {
        return Err(EngineError::InvalidResponse(format!("Invalid timestamp {}", seconds)));
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| EngineError::InvalidResponse(format!("Timestamp out of range: {}", seconds)))
}
