//! API error responses.
//!
//! Client errors answer 400 with `{"message": ...}`. Upstream failures
//! answer 500 with a generic message; the detail only goes to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use stepgate_core::{GateError, NotifyError};
use thiserror::Error;
use tracing::{error, warn};

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Redirect target is not a valid header value: {0}")]
    InvalidRedirect(String),
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        let client = match self {
            ApiError::Gate(e) => e.is_client_error(),
            ApiError::Notify(e) => e.is_client_error(),
            ApiError::InvalidRequest(_) => true,
            ApiError::InvalidRedirect(_) => false,
        };
        if client {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_client_error() {
            warn!("Rejected request: {}", self);
            self.to_string()
        } else {
            error!("Request failed: {}", self);
            INTERNAL_ERROR.to_string()
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepgate_protocols::{ChannelError, EngineError, IdentityError};

    #[test]
    fn test_gate_client_errors_are_400() {
        for err in [
            GateError::MissingParameters,
            GateError::TaskTimedOut,
            GateError::InvalidToken,
            GateError::TaskDoesNotExist,
            GateError::ExecutionNotFound,
            GateError::PreviousExecutionsRunning,
            GateError::InvalidName("execution_name"),
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_upstream_errors_are_500() {
        let err = ApiError::from(GateError::from(EngineError::Network("down".into())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::from(NotifyError::from(ChannelError::SendFailed("x".into())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::InvalidRedirect("x".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_notify_identity_error_is_400() {
        let err = ApiError::from(NotifyError::from(IdentityError::NotAnArn("x".into())));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transparent_message() {
        let err = ApiError::from(GateError::InvalidToken);
        assert_eq!(err.to_string(), "The token is invalid");
    }
}
