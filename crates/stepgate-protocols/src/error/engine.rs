//! Workflow engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The wait-point's heartbeat or timeout elapsed before the signal arrived.
    #[error("Task timed out: {0}")]
    TaskTimedOut(String),

    /// The token is malformed or has already been consumed.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Task does not exist: {0}")]
    TaskDoesNotExist(String),

    #[error("Engine API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl EngineError {
    /// Map an engine error code to an error.
    ///
    /// Codes may arrive fully qualified (`com.amazonaws...#TaskTimedOut`);
    /// only the part after the last `#` is matched.
    pub fn from_error_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let short = code.rsplit('#').next().unwrap_or(code);
        match short {
            "TaskTimedOut" => EngineError::TaskTimedOut(message),
            "InvalidToken" => EngineError::InvalidToken(message),
            "TaskDoesNotExist" => EngineError::TaskDoesNotExist(message),
            _ => EngineError::Api {
                code: short.to_string(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_code_short() {
        let err = EngineError::from_error_code("TaskTimedOut", "late");
        assert!(matches!(err, EngineError::TaskTimedOut(ref m) if m == "late"));
    }

    #[test]
    fn test_from_error_code_qualified() {
        let err = EngineError::from_error_code(
            "com.amazonaws.swf.service.v2.model#InvalidToken",
            "bad token",
        );
        assert!(matches!(err, EngineError::InvalidToken(_)));
    }

    #[test]
    fn test_from_error_code_task_missing() {
        let err = EngineError::from_error_code("TaskDoesNotExist", "gone");
        assert!(matches!(err, EngineError::TaskDoesNotExist(_)));
    }

    #[test]
    fn test_from_error_code_unknown() {
        let err = EngineError::from_error_code("ThrottlingException", "slow down");
        match err {
            EngineError::Api { code, message } => {
                assert_eq!(code, "ThrottlingException");
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let err = EngineError::Api {
            code: "AccessDenied".to_string(),
            message: "no".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("AccessDenied"));
        assert!(display.contains("no"));
    }
}
