//! Core errors.

use stepgate_protocols::{ChannelError, EngineError, IdentityError, ParseDecisionError};
use thiserror::Error;

/// Why a decision request was refused or failed.
///
/// Display strings of client errors are the operator-facing messages.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Missing one or more required parameters")]
    MissingParameters,

    #[error(transparent)]
    InvalidAction(#[from] ParseDecisionError),

    #[error("Invalid {0}")]
    InvalidName(&'static str),

    #[error("The execution does not exist")]
    ExecutionNotFound,

    #[error("Cannot approve or reject until previous executions have finished")]
    PreviousExecutionsRunning,

    #[error("The task has timed out")]
    TaskTimedOut,

    #[error("The token is invalid")]
    InvalidToken,

    #[error("The task does not exist")]
    TaskDoesNotExist,

    #[error("Workflow engine failure: {0}")]
    Engine(EngineError),

    #[error("Notification failure: {0}")]
    Channel(#[from] ChannelError),
}

impl GateError {
    /// Whether the request itself was at fault (as opposed to an upstream).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, GateError::Engine(_) | GateError::Channel(_))
    }
}

impl From<EngineError> for GateError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TaskTimedOut(_) => GateError::TaskTimedOut,
            EngineError::InvalidToken(_) => GateError::InvalidToken,
            EngineError::TaskDoesNotExist(_) => GateError::TaskDoesNotExist,
            other => GateError::Engine(other),
        }
    }
}

/// Why a notification could not be produced or delivered.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid identifier: {0}")]
    Identity(#[from] IdentityError),

    #[error("Invalid callback URL '{url}': {message}")]
    InvalidCallbackUrl { url: String, message: String },

    #[error("Notification failure: {0}")]
    Channel(#[from] ChannelError),
}

impl NotifyError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, NotifyError::Identity(_))
    }
}
