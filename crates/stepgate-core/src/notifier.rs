//! Notifier: announces a suspended execution to the operator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stepgate_protocols::{ExecutionId, NotificationChannel, NotificationMessage, StateMachineId};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::NotifyError;
use crate::links::DecisionLinks;
use crate::message;

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;

/// Event emitted by the workflow when it reaches the approval step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspendedExecutionEvent {
    /// Fully-qualified execution identifier.
    pub execution_id: String,
    /// Resume token for the waiting step.
    pub token: String,
    /// Fully-qualified state machine identifier.
    pub state_machine_id: String,
    /// Name of the waiting step, shown as the status line.
    pub state_name: String,
}

/// Sends approve/reject messages for suspended executions.
pub struct Notifier {
    callback_url: Url,
    channel: Arc<dyn NotificationChannel>,
}

impl Notifier {
    /// `callback_url` is the decision endpoint the links point at.
    pub fn new(
        callback_url: &str,
        channel: Arc<dyn NotificationChannel>,
    ) -> Result<Self, NotifyError> {
        let callback_url =
            Url::parse(callback_url).map_err(|e| NotifyError::InvalidCallbackUrl {
                url: callback_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            callback_url,
            channel,
        })
    }

    pub fn callback_url(&self) -> &Url {
        &self.callback_url
    }

    /// Compose the message for `event` without sending it.
    pub fn compose(
        &self,
        event: &SuspendedExecutionEvent,
        timestamp: &str,
    ) -> Result<NotificationMessage, NotifyError> {
        let execution = ExecutionId::parse(&event.execution_id)?;
        let state_machine = StateMachineId::parse(&event.state_machine_id)?;

        if execution.state_machine_name() != state_machine.name {
            warn!(
                "Execution {} does not belong to state machine {}, using the latter for the message",
                execution, state_machine
            );
        }
        let execution = state_machine.execution(execution.name);

        let links = DecisionLinks::build(&self.callback_url, &execution, &event.token);
        debug!("Created approve link '{}'", links.approve);
        debug!("Created reject link '{}'", links.reject);

        Ok(message::approval_request(
            &execution,
            &event.state_name,
            timestamp,
            &links,
        ))
    }

    /// Send one approval request. No retry.
    pub async fn notify(&self, event: &SuspendedExecutionEvent) -> Result<(), NotifyError> {
        let message = self.compose(event, &message::now())?;
        self.channel.send(&message).await?;
        info!(
            "Approval requested for {} via {}",
            event.execution_id,
            self.channel.id()
        );
        Ok(())
    }
}
