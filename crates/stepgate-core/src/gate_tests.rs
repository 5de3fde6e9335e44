use super::*;
use crate::memory::{EngineCall, MemoryEngine, RecordingChannel};
use chrono::{TimeZone, Utc};
use stepgate_protocols::{ExecutionRecord, ExecutionStatus, StateMachineId};

const REGION: &str = "us-east-1";
const ACCOUNT: &str = "123456789012";

struct Harness {
    gate: DecisionGate,
    engine: Arc<MemoryEngine>,
    channel: Arc<RecordingChannel>,
}

fn harness(settings: GateSettings) -> Harness {
    let engine = Arc::new(MemoryEngine::new());
    let channel = Arc::new(RecordingChannel::new());
    let gate = DecisionGate::new(settings, engine.clone(), channel.clone());
    Harness {
        gate,
        engine,
        channel,
    }
}

fn default_harness() -> Harness {
    harness(GateSettings::new(REGION, ACCOUNT))
}

fn ordered_harness() -> Harness {
    harness(GateSettings::new(REGION, ACCOUNT).with_ordered_approvals(true))
}

fn params(token: &str, action: &str, execution: &str, state_machine: &str) -> DecisionParams {
    DecisionParams {
        token: Some(token.to_string()),
        action: Some(action.to_string()),
        execution_name: Some(execution.to_string()),
        state_machine_name: Some(state_machine.to_string()),
    }
}

fn add_execution(engine: &MemoryEngine, name: &str, status: ExecutionStatus, minute: u32) {
    let sm = StateMachineId::new(REGION, ACCOUNT, "deploy-pipeline");
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap();
    engine.add_execution(ExecutionRecord::new(&sm.execution(name), status, start));
}

#[tokio::test]
async fn test_approve_worked_example() {
    let h = default_harness();
    h.engine.add_task("T1");

    let outcome = h
        .gate
        .decide(&params("T1", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap();

    assert_eq!(outcome.decision, Decision::Approve);
    assert_eq!(
        outcome.redirect_url,
        "https://console.aws.amazon.com/states/home?region=us-east-1#/executions/details/arn:aws:states:us-east-1:123456789012:execution:deploy-pipeline:run-42"
    );
    assert_eq!(
        h.engine.signals(),
        vec![EngineCall::Success {
            token: "T1".to_string(),
            output: json!({}),
        }]
    );

    let messages = h.channel.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].title, "deploy-pipeline");
    assert_eq!(messages[0].lines[0], "*Execution:* run-42");
    assert_eq!(
        messages[0].lines[2],
        "*Status:* Manually approved, continuing execution"
    );
    assert!(messages[0].actions.is_empty());
}

#[tokio::test]
async fn test_reject_sends_failure_without_notification() {
    let h = default_harness();
    h.engine.add_task("T2");

    let outcome = h
        .gate
        .decide(&params("T2", "reject", "run-43", "deploy-pipeline"))
        .await
        .unwrap();

    assert_eq!(outcome.decision, Decision::Reject);
    assert!(outcome.redirect_url.contains("execution:deploy-pipeline:run-43"));
    assert_eq!(
        h.engine.signals(),
        vec![EngineCall::Failure {
            token: "T2".to_string(),
            failure: TaskFailure::new(
                "ManualRejection",
                "The execution was stopped because of a manual rejection."
            ),
        }]
    );
    assert!(h.channel.messages().is_empty());
}

#[tokio::test]
async fn test_missing_parameter_makes_no_calls() {
    let h = default_harness();
    h.engine.add_task("T1");

    let mut cases = Vec::new();
    for i in 0..4 {
        let mut p = params("T1", "approve", "run-42", "deploy-pipeline");
        match i {
            0 => p.token = None,
            1 => p.action = None,
            2 => p.execution_name = None,
            _ => p.state_machine_name = None,
        }
        cases.push(p);
    }
    cases.push(DecisionParams::default());

    for p in &cases {
        let err = h.gate.decide(p).await.unwrap_err();
        assert!(matches!(err, GateError::MissingParameters), "{:?}", p);
    }
    assert!(h.engine.calls().is_empty());
    assert!(h.channel.messages().is_empty());
}

#[tokio::test]
async fn test_empty_parameter_is_missing() {
    let h = default_harness();
    let err = h
        .gate
        .decide(&params("", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::MissingParameters));
    assert!(h.engine.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_action_rejected() {
    let h = default_harness();
    h.engine.add_task("T1");

    let err = h
        .gate
        .decide(&params("T1", "maybe", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidAction(_)));
    assert!(err.is_client_error());
    assert!(h.engine.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_names_make_no_calls() {
    let h = default_harness();
    h.engine.add_task("T1");

    let cases = [
        ("run\n42", "deploy-pipeline", "execution_name"),
        ("a:b", "deploy-pipeline", "execution_name"),
        ("   ", "deploy-pipeline", "execution_name"),
        ("run-42", "deploy:pipeline", "state_machine_name"),
        ("run-42", "deploy\u{7f}", "state_machine_name"),
    ];
    for (execution, state_machine, field) in cases {
        let err = h
            .gate
            .decide(&params("T1", "approve", execution, state_machine))
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::InvalidName(f) if f == field), "{:?}", execution);
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), format!("Invalid {}", field));
    }
    assert!(h.engine.calls().is_empty());
    assert!(h.channel.messages().is_empty());
}

#[tokio::test]
async fn test_token_reuse_is_invalid() {
    let h = default_harness();
    h.engine.add_task("T1");
    let p = params("T1", "approve", "run-42", "deploy-pipeline");

    h.gate.decide(&p).await.unwrap();
    let err = h.gate.decide(&p).await.unwrap_err();

    assert!(matches!(err, GateError::InvalidToken));
    assert_eq!(err.to_string(), "The token is invalid");
    assert_eq!(h.channel.messages().len(), 1);
}

#[tokio::test]
async fn test_timed_out_task() {
    let h = default_harness();
    h.engine.add_timed_out_task("T1");

    let err = h
        .gate
        .decide(&params("T1", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::TaskTimedOut));
    assert!(h.channel.messages().is_empty());
}

#[tokio::test]
async fn test_missing_task() {
    let h = default_harness();
    h.engine.add_missing_task("T1");

    let err = h
        .gate
        .decide(&params("T1", "reject", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::TaskDoesNotExist));
}

#[tokio::test]
async fn test_engine_outage_is_unexpected() {
    let h = default_harness();
    h.engine.add_task("T1");
    h.engine.set_unavailable(true);

    let err = h
        .gate
        .decide(&params("T1", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::Engine(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_channel_failure_after_approval() {
    let h = default_harness();
    h.engine.add_task("T1");
    h.channel.set_failing(true);

    let err = h
        .gate
        .decide(&params("T1", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::Channel(_)));
    // The engine signal has already been applied.
    assert_eq!(h.engine.signals().len(), 1);
}

#[tokio::test]
async fn test_ordering_disabled_skips_listing() {
    let h = default_harness();
    h.engine.add_task("T1");
    add_execution(&h.engine, "run-41", ExecutionStatus::Running, 0);
    add_execution(&h.engine, "run-42", ExecutionStatus::Running, 5);

    h.gate
        .decide(&params("T1", "approve", "run-42", "deploy-pipeline"))
        .await
        .unwrap();
    assert!(h.engine.calls().iter().all(|c| c.is_signal()));
}

#[tokio::test]
async fn test_ordering_blocks_on_earlier_running() {
    let h = ordered_harness();
    h.engine.add_task("TB");
    add_execution(&h.engine, "A", ExecutionStatus::Running, 0);
    add_execution(&h.engine, "B", ExecutionStatus::Running, 5);

    let err = h
        .gate
        .decide(&params("TB", "approve", "B", "deploy-pipeline"))
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::PreviousExecutionsRunning));
    assert_eq!(
        err.to_string(),
        "Cannot approve or reject until previous executions have finished"
    );
    assert!(h.engine.signals().is_empty());
    assert!(h.channel.messages().is_empty());
}

#[tokio::test]
async fn test_ordering_allows_after_earlier_finished() {
    let h = ordered_harness();
    h.engine.add_task("TB");
    add_execution(&h.engine, "A", ExecutionStatus::Succeeded, 0);
    add_execution(&h.engine, "B", ExecutionStatus::Running, 5);

    h.gate
        .decide(&params("TB", "reject", "B", "deploy-pipeline"))
        .await
        .unwrap();

    let calls = h.engine.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        EngineCall::List {
            state_machine_arn: "arn:aws:states:us-east-1:123456789012:stateMachine:deploy-pipeline"
                .to_string(),
            max_results: 500,
        }
    );
    assert!(calls[1].is_signal());
}

#[tokio::test]
async fn test_ordering_unknown_execution() {
    let h = ordered_harness();
    h.engine.add_task("TB");
    add_execution(&h.engine, "A", ExecutionStatus::Running, 0);

    let err = h
        .gate
        .decide(&params("TB", "approve", "B", "deploy-pipeline"))
        .await
        .unwrap_err();
    assert!(matches!(err, GateError::ExecutionNotFound));
    assert_eq!(err.to_string(), "The execution does not exist");
    assert!(h.engine.signals().is_empty());
}

#[tokio::test]
async fn test_ordering_uses_configured_page_size() {
    let h = harness(
        GateSettings::new(REGION, ACCOUNT)
            .with_ordered_approvals(true)
            .with_max_listed_executions(25),
    );
    h.engine.add_task("TB");
    add_execution(&h.engine, "B", ExecutionStatus::Running, 5);

    h.gate
        .decide(&params("TB", "approve", "B", "deploy-pipeline"))
        .await
        .unwrap();
    assert!(matches!(
        h.engine.calls()[0],
        EngineCall::List { max_results: 25, .. }
    ));
}
