//! In-process engine and channel.
//!
//! [`MemoryEngine`] enforces the same single-use token semantics as a real
//! engine and records every call; [`RecordingChannel`] keeps every message
//! it is handed. Both back the test suites and `serve --dry-run`.
//!
//! History is capped at [`DEFAULT_HISTORY_LIMIT`] entries per kind (calls,
//! consumed tokens, messages), oldest dropped first. A consumed token that
//! falls off the end is accepted again by a permissive engine.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use stepgate_protocols::{
    ChannelError, EngineError, ExecutionRecord, NotificationChannel, NotificationMessage,
    StateMachineId, TaskFailure, WorkflowEngine,
};
use tracing::info;

/// Id reported by [`MemoryEngine`].
pub const MEMORY_ENGINE_ID: &str = "memory";

/// Id reported by [`RecordingChannel`].
pub const RECORDING_CHANNEL_ID: &str = "recording";

/// Entries kept per history kind before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 10_000;

/// A call received by [`MemoryEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Success { token: String, output: Value },
    Failure { token: String, failure: TaskFailure },
    List { state_machine_arn: String, max_results: u32 },
}

impl EngineCall {
    /// Whether the call changes engine state.
    pub fn is_signal(&self) -> bool {
        !matches!(self, EngineCall::List { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Waiting,
    TimedOut,
    Missing,
}

#[derive(Default)]
struct EngineState {
    tasks: HashMap<String, TaskState>,
    consumed: HashSet<String>,
    consumed_order: VecDeque<String>,
    executions: Vec<ExecutionRecord>,
    calls: VecDeque<EngineCall>,
}

impl EngineState {
    fn record(&mut self, call: EngineCall, limit: usize) {
        if self.calls.len() >= limit {
            self.calls.pop_front();
        }
        self.calls.push_back(call);
    }

    fn mark_consumed(&mut self, token: &str, limit: usize) {
        if self.consumed_order.len() >= limit {
            if let Some(oldest) = self.consumed_order.pop_front() {
                self.consumed.remove(&oldest);
            }
        }
        self.consumed.insert(token.to_string());
        self.consumed_order.push_back(token.to_string());
    }
}

/// Workflow engine held in memory.
pub struct MemoryEngine {
    state: Mutex<EngineState>,
    accept_unknown: bool,
    unavailable: AtomicBool,
    history_limit: usize,
}

impl MemoryEngine {
    /// Only registered tokens are accepted.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            accept_unknown: false,
            unavailable: AtomicBool::new(false),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Any token is accepted once.
    pub fn permissive() -> Self {
        Self {
            accept_unknown: true,
            ..Self::new()
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Register a task waiting on `token`.
    pub fn add_task(&self, token: impl Into<String>) {
        self.state.lock().tasks.insert(token.into(), TaskState::Waiting);
    }

    /// Register a task whose timeout already elapsed.
    pub fn add_timed_out_task(&self, token: impl Into<String>) {
        self.state.lock().tasks.insert(token.into(), TaskState::TimedOut);
    }

    /// Register a token whose task no longer exists.
    pub fn add_missing_task(&self, token: impl Into<String>) {
        self.state.lock().tasks.insert(token.into(), TaskState::Missing);
    }

    pub fn add_execution(&self, record: ExecutionRecord) {
        self.state.lock().executions.push(record);
    }

    /// Make every call fail with a network error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.iter().cloned().collect()
    }

    /// Calls that change engine state.
    pub fn signals(&self) -> Vec<EngineCall> {
        self.state.lock().calls.iter().filter(|c| c.is_signal()).cloned().collect()
    }

    fn check_available(&self) -> Result<(), EngineError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EngineError::Network("engine unavailable".to_string()));
        }
        Ok(())
    }

    fn consume(&self, state: &mut EngineState, token: &str) -> Result<(), EngineError> {
        if state.consumed.contains(token) {
            return Err(EngineError::InvalidToken("Task token has already been used".to_string()));
        }
        match state.tasks.get(token).copied() {
            Some(TaskState::Waiting) => {}
            Some(TaskState::TimedOut) => {
                return Err(EngineError::TaskTimedOut("Task timed out".to_string()));
            }
            Some(TaskState::Missing) => {
                return Err(EngineError::TaskDoesNotExist("Task does not exist".to_string()));
            }
            None if self.accept_unknown => {}
            None => return Err(EngineError::InvalidToken("Invalid token".to_string())),
        }
        state.tasks.remove(token);
        state.mark_consumed(token, self.history_limit);
        Ok(())
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowEngine for MemoryEngine {
    fn id(&self) -> &str {
        MEMORY_ENGINE_ID
    }

    async fn send_task_success(&self, token: &str, output: &Value) -> Result<(), EngineError> {
        self.check_available()?;
        let mut state = self.state.lock();
        state.record(
            EngineCall::Success {
                token: token.to_string(),
                output: output.clone(),
            },
            self.history_limit,
        );
        self.consume(&mut state, token)?;
        info!("Memory engine resumed task with output {}", output);
        Ok(())
    }

    async fn send_task_failure(
        &self,
        token: &str,
        failure: &TaskFailure,
    ) -> Result<(), EngineError> {
        self.check_available()?;
        let mut state = self.state.lock();
        state.record(
            EngineCall::Failure {
                token: token.to_string(),
                failure: failure.clone(),
            },
            self.history_limit,
        );
        self.consume(&mut state, token)?;
        info!("Memory engine failed task: {}", failure.error);
        Ok(())
    }

    async fn list_executions(
        &self,
        state_machine: &StateMachineId,
        max_results: u32,
    ) -> Result<Vec<ExecutionRecord>, EngineError> {
        self.check_available()?;
        let arn = state_machine.arn();
        let mut state = self.state.lock();
        state.record(
            EngineCall::List {
                state_machine_arn: arn.clone(),
                max_results,
            },
            self.history_limit,
        );

        let mut records: Vec<ExecutionRecord> = state
            .executions
            .iter()
            .filter(|r| r.state_machine_arn == arn)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        records.truncate(max_results as usize);
        Ok(records)
    }
}

/// Channel that keeps recent messages in memory.
pub struct RecordingChannel {
    messages: Mutex<VecDeque<NotificationMessage>>,
    failing: AtomicBool,
    history_limit: usize,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            failing: AtomicBool::new(false),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Make every send fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages.lock().iter().cloned().collect()
    }
}

impl Default for RecordingChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn id(&self) -> &str {
        RECORDING_CHANNEL_ID
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), ChannelError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChannelError::SendFailed("recording channel set to fail".to_string()));
        }
        info!("Recorded notification '{}':\n{}", message.title, message.text());
        let mut messages = self.messages.lock();
        if messages.len() >= self.history_limit {
            messages.pop_front();
        }
        messages.push_back(message.clone());
        Ok(())
    }
}
