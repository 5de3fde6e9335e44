//! Execution ordering gate.
//!
//! When enabled, a decision is refused while any execution of the same
//! workflow that started strictly earlier is still RUNNING. This is a
//! read-then-act check: an execution may change state between the listing
//! and the signal, so the guarantee is only "no known-earlier RUNNING
//! execution at check time".

use stepgate_protocols::{ExecutionId, ExecutionRecord, WorkflowEngine};
use tracing::debug;

use crate::error::GateError;

/// Refuse `execution` if an earlier-started execution is still running.
pub async fn check_execution_order(
    engine: &dyn WorkflowEngine,
    execution: &ExecutionId,
    max_results: u32,
) -> Result<(), GateError> {
    let records = engine
        .list_executions(&execution.state_machine, max_results)
        .await?;
    debug!(
        "Listed {} executions of {} for ordering check",
        records.len(),
        execution.state_machine_name()
    );
    check_records(&records, execution)
}

/// Pure part of the ordering check.
pub fn check_records(records: &[ExecutionRecord], execution: &ExecutionId) -> Result<(), GateError> {
    let arn = execution.arn();
    let current = records
        .iter()
        .find(|r| r.execution_arn == arn)
        .ok_or(GateError::ExecutionNotFound)?;

    let blocked = records
        .iter()
        .any(|r| r.is_running() && r.start_date < current.start_date);
    if blocked {
        return Err(GateError::PreviousExecutionsRunning);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use stepgate_protocols::ExecutionStatus;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap()
    }

    fn record(name: &str, status: ExecutionStatus, minute: u32) -> ExecutionRecord {
        let id = ExecutionId::new("us-east-1", "123456789012", "sm", name);
        ExecutionRecord::new(&id, status, at(minute))
    }

    fn current() -> ExecutionId {
        ExecutionId::new("us-east-1", "123456789012", "sm", "B")
    }

    #[test]
    fn test_earlier_running_blocks() {
        let records = vec![
            record("A", ExecutionStatus::Running, 0),
            record("B", ExecutionStatus::Running, 5),
        ];
        assert!(matches!(
            check_records(&records, &current()),
            Err(GateError::PreviousExecutionsRunning)
        ));
    }

    #[test]
    fn test_earlier_finished_allows() {
        let records = vec![
            record("A", ExecutionStatus::Succeeded, 0).with_stop_date(at(2)),
            record("C", ExecutionStatus::Failed, 1),
            record("B", ExecutionStatus::Running, 5),
        ];
        assert!(check_records(&records, &current()).is_ok());
    }

    #[test]
    fn test_later_running_allows() {
        let records = vec![
            record("B", ExecutionStatus::Running, 5),
            record("C", ExecutionStatus::Running, 9),
        ];
        assert!(check_records(&records, &current()).is_ok());
    }

    #[test]
    fn test_same_start_time_allows() {
        let records = vec![
            record("A", ExecutionStatus::Running, 5),
            record("B", ExecutionStatus::Running, 5),
        ];
        assert!(check_records(&records, &current()).is_ok());
    }

    #[test]
    fn test_missing_current_execution() {
        let records = vec![record("A", ExecutionStatus::Running, 0)];
        assert!(matches!(
            check_records(&records, &current()),
            Err(GateError::ExecutionNotFound)
        ));
    }

    #[test]
    fn test_empty_listing() {
        assert!(matches!(
            check_records(&[], &current()),
            Err(GateError::ExecutionNotFound)
        ));
    }
}
