//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Largest page the engine accepts for ListExecutions.
const MAX_LISTED_EXECUTIONS: u32 = 1000;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_notifier(config, &mut result);
        Self::validate_gate(config, &mut result);
        Self::validate_slack(config, &mut result);
        Self::validate_engine(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_notifier(config: &Config, result: &mut ValidationResult) {
        let Some(ref raw) = config.notifier.callback_url else {
            result.add_error(ValidationError::new(
                "notifier.callback_url",
                "callback_url is not set (file or API_URL)",
            ));
            return;
        };

        match url::Url::parse(raw) {
            Ok(parsed) => match parsed.scheme() {
                "https" => {}
                "http" => result.add_warning(ValidationWarning::new(
                    "notifier.callback_url",
                    "callback_url uses plain http, task tokens will travel unencrypted",
                )),
                other => result.add_error(ValidationError::new(
                    "notifier.callback_url",
                    format!("Unsupported scheme '{}', expected http or https", other),
                )),
            },
            Err(e) => result.add_error(ValidationError::new(
                "notifier.callback_url",
                format!("Invalid URL: {}", e),
            )),
        }
    }

    fn validate_gate(config: &Config, result: &mut ValidationResult) {
        let max = config.gate.max_listed_executions;
        if max == 0 || max > MAX_LISTED_EXECUTIONS {
            result.add_error(ValidationError::new(
                "gate.max_listed_executions",
                format!("max_listed_executions must be between 1 and {}", MAX_LISTED_EXECUTIONS),
            ));
        }
    }

    fn validate_slack(config: &Config, result: &mut ValidationResult) {
        match config.slack.webhook_url {
            None => result.add_error(ValidationError::new(
                "slack.webhook_url",
                "webhook_url is not set (file or SLACK_WEBHOOK_URL)",
            )),
            Some(ref url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                result.add_error(ValidationError::new(
                    "slack.webhook_url",
                    "webhook_url must start with http:// or https://",
                ));
            }
            Some(_) => {}
        }

        if config.slack.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "slack.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        if config.engine.region().is_err() {
            result.add_error(ValidationError::new(
                "engine.region",
                "region is not set (file or AWS_REGION)",
            ));
        }

        match config.engine.account_id.as_deref() {
            None | Some("") => result.add_error(ValidationError::new(
                "engine.account_id",
                "account_id is not set (file or AWS_ACCOUNT_ID)",
            )),
            Some(id) if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) => {
                result.add_warning(ValidationWarning::new(
                    "engine.account_id",
                    format!("account_id '{}' is not a 12-digit account number", id),
                ));
            }
            Some(_) => {}
        }

        if let Some(ref endpoint) = config.engine.endpoint {
            if url::Url::parse(endpoint).is_err() {
                result.add_error(ValidationError::new(
                    "engine.endpoint",
                    "endpoint is not a valid URL",
                ));
            }
        }

        if config.engine.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "engine.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
