//! Decision gate: applies the operator's approve/reject choice.
//!
//! A request moves through validation, the optional ordering check, one
//! engine signal and, for approvals, one follow-up notification. Every
//! failure is terminal; nothing is retried.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stepgate_protocols::{
    Decision, ExecutionId, NotificationChannel, TaskFailure, WorkflowEngine,
};
use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::links::params as param_names;
use crate::message;
use crate::ordering;

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;

/// Error code reported to the engine on rejection.
pub const REJECTION_ERROR: &str = "ManualRejection";

/// Cause reported to the engine on rejection.
pub const REJECTION_CAUSE: &str = "The execution was stopped because of a manual rejection.";

/// Ambient settings for rebuilding identities and ordering.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub region: String,
    pub account_id: String,
    pub ordered_approvals: bool,
    pub max_listed_executions: u32,
}

impl GateSettings {
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
            ordered_approvals: false,
            max_listed_executions: 500,
        }
    }

    pub fn with_ordered_approvals(mut self, enabled: bool) -> Self {
        self.ordered_approvals = enabled;
        self
    }

    pub fn with_max_listed_executions(mut self, max: u32) -> Self {
        self.max_listed_executions = max;
        self
    }
}

/// Raw query parameters of a decision request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionParams {
    pub token: Option<String>,
    pub action: Option<String>,
    pub execution_name: Option<String>,
    pub state_machine_name: Option<String>,
}

/// A validated decision request.
struct DecisionRequest<'a> {
    token: &'a str,
    decision: Decision,
    execution: ExecutionId,
}

/// Result of an applied decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub decision: Decision,
    /// Engine console page of the execution.
    pub redirect_url: String,
}

pub struct DecisionGate {
    settings: GateSettings,
    engine: Arc<dyn WorkflowEngine>,
    channel: Arc<dyn NotificationChannel>,
}

impl DecisionGate {
    pub fn new(
        settings: GateSettings,
        engine: Arc<dyn WorkflowEngine>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self {
            settings,
            engine,
            channel,
        }
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    pub fn engine_id(&self) -> &str {
        self.engine.id()
    }

    pub fn channel_id(&self) -> &str {
        self.channel.id()
    }

    /// Apply one decision request.
    pub async fn decide(&self, params: &DecisionParams) -> Result<GateOutcome, GateError> {
        let request = self.validate(params)?;
        let execution = &request.execution;
        debug!("Decision '{}' received for {}", request.decision, execution);

        if self.settings.ordered_approvals {
            ordering::check_execution_order(
                self.engine.as_ref(),
                execution,
                self.settings.max_listed_executions,
            )
            .await
            .inspect_err(|e| warn!("Ordering check refused {}: {}", execution, e))?;
        }

        match request.decision {
            Decision::Approve => self.approve(&request).await?,
            Decision::Reject => self.reject(&request).await?,
        }

        Ok(GateOutcome {
            decision: request.decision,
            redirect_url: execution.console_url(),
        })
    }

    fn validate<'a>(&self, params: &'a DecisionParams) -> Result<DecisionRequest<'a>, GateError> {
        let (Some(token), Some(action), Some(execution_name), Some(state_machine_name)) = (
            present(&params.token),
            present(&params.action),
            present(&params.execution_name),
            present(&params.state_machine_name),
        ) else {
            warn!("Missing one or more required parameters");
            return Err(GateError::MissingParameters);
        };

        let decision = action.parse::<Decision>().inspect_err(|e| warn!("{}", e))?;
        let execution_name = valid_name(param_names::EXECUTION_NAME, execution_name)?;
        let state_machine_name = valid_name(param_names::STATE_MACHINE_NAME, state_machine_name)?;
        let execution = ExecutionId::new(
            &self.settings.region,
            &self.settings.account_id,
            state_machine_name,
            execution_name,
        );

        Ok(DecisionRequest {
            token,
            decision,
            execution,
        })
    }

    async fn approve(&self, request: &DecisionRequest<'_>) -> Result<(), GateError> {
        self.engine
            .send_task_success(request.token, &json!({}))
            .await
            .inspect_err(|e| warn!("Approval of {} refused by engine: {}", request.execution, e))?;
        info!("Approved {}", request.execution);

        let confirmation = message::approval_confirmation(&request.execution, &message::now());
        self.channel.send(&confirmation).await?;
        Ok(())
    }

    async fn reject(&self, request: &DecisionRequest<'_>) -> Result<(), GateError> {
        let failure = TaskFailure::new(REJECTION_ERROR, REJECTION_CAUSE);
        self.engine
            .send_task_failure(request.token, &failure)
            .await
            .inspect_err(|e| warn!("Rejection of {} refused by engine: {}", request.execution, e))?;
        info!("Rejected {}", request.execution);
        Ok(())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Names become ARN segments and part of the redirect header, so `:`,
/// control characters and blank values are refused.
fn valid_name<'a>(field: &'static str, name: &'a str) -> Result<&'a str, GateError> {
    if name.trim().is_empty() || name.chars().any(|c| c == ':' || c.is_control()) {
        warn!("Invalid {}: {:?}", field, name);
        return Err(GateError::InvalidName(field));
    }
    Ok(name)
}
