//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Notifier configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Base URL of the decision endpoint embedded in approve/reject links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl NotifierConfig {
    pub fn callback_url(&self) -> Result<&str, ConfigError> {
        required(&self.callback_url, "notifier.callback_url")
    }
}

/// Decision gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Refuse decisions while an earlier-started execution is still running.
    #[serde(default)]
    pub ordered_approvals: bool,

    /// Page size used when listing executions for the ordering check.
    #[serde(default = "default_max_listed_executions")]
    pub max_listed_executions: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            ordered_approvals: false,
            max_listed_executions: default_max_listed_executions(),
        }
    }
}

fn default_max_listed_executions() -> u32 {
    500
}

/// Slack incoming-webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default = "default_slack_timeout")]
    pub timeout_seconds: u64,
}

impl SlackConfig {
    pub fn webhook_url(&self) -> Result<&str, ConfigError> {
        required(&self.webhook_url, "slack.webhook_url")
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: default_slack_timeout(),
        }
    }
}

fn default_slack_timeout() -> u64 {
    10
}

/// Workflow engine (Step Functions) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Override for the regional endpoint (local emulators, signing proxies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_engine_timeout")]
    pub timeout_seconds: u64,
}

impl EngineConfig {
    pub fn region(&self) -> Result<&str, ConfigError> {
        required(&self.region, "engine.region")
    }

    pub fn account_id(&self) -> Result<&str, ConfigError> {
        required(&self.account_id, "engine.account_id")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region: None,
            account_id: None,
            endpoint: None,
            timeout_seconds: default_engine_timeout(),
        }
    }
}

fn default_engine_timeout() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file: default_true(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ConfigError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field.to_string())),
    }
}
