//! Notification channel errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_error() {
        let err = ChannelError::ConnectionFailed("timeout".to_string());
        let display = err.to_string();
        assert!(display.contains("Connection failed"));
        assert!(display.contains("timeout"));
    }

    #[test]
    fn test_send_failed_error() {
        let err = ChannelError::SendFailed("HTTP 500".to_string());
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_error_debug() {
        let err = ChannelError::InvalidPayload("x".to_string());
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidPayload"));
    }
}
