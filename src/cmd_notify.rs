//! `stepgate notify`: one-shot notifier run.

use std::io::Read;
use std::path::Path;

use tracing::info;

use stepgate_config::Config;
use stepgate_core::SuspendedExecutionEvent;

use crate::server::{build_channel, build_notifier};

type BoxError = Box<dyn std::error::Error>;

/// Read an event from a JSON file, or stdin when `source` is `-`.
pub(crate) fn read_event(source: &str) -> Result<SuspendedExecutionEvent, BoxError> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    parse_event(&content)
}

pub(crate) fn parse_event(content: &str) -> Result<SuspendedExecutionEvent, BoxError> {
    serde_json::from_str(content).map_err(|e| format!("Invalid event: {}", e).into())
}

pub(crate) async fn handle_notify_command(
    config: &Config,
    source: &str,
    dry_run: bool,
) -> Result<(), BoxError> {
    let event = read_event(source)?;
    let channel = build_channel(config, dry_run)?;
    let notifier = build_notifier(config, channel, dry_run)?;

    notifier.notify(&event).await?;
    info!("Notification sent for {}", event.execution_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EVENT: &str = r#"{
        "execution_id": "arn:aws:states:us-east-1:123456789012:execution:deploy-pipeline:run-42",
        "token": "T1",
        "state_machine_id": "arn:aws:states:us-east-1:123456789012:stateMachine:deploy-pipeline",
        "state_name": "WaitForApproval"
    }"#;

    #[test]
    fn test_read_event_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", EVENT).unwrap();

        let event = read_event(file.path().to_str().unwrap()).unwrap();
        assert_eq!(event.token, "T1");
        assert_eq!(event.state_name, "WaitForApproval");
    }

    #[test]
    fn test_read_event_missing_file() {
        assert!(read_event("/nonexistent/event.json").is_err());
    }

    #[test]
    fn test_parse_event_missing_field() {
        let err = parse_event(r#"{"token": "T1"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid event"));
    }

    #[tokio::test]
    async fn test_dry_run_notify() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", EVENT).unwrap();

        handle_notify_command(&Config::default(), file.path().to_str().unwrap(), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_notify_rejects_malformed_identity() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"execution_id":"run-42","token":"T1","state_machine_id":"sm","state_name":"Wait"}}"#
        )
        .unwrap();

        let result =
            handle_notify_command(&Config::default(), file.path().to_str().unwrap(), true).await;
        assert!(result.is_err());
    }
}
