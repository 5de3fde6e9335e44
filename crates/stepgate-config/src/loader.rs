//! Configuration loader.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::schema::Config;

/// Environment variables that override file settings.
pub mod env_keys {
    pub const API_URL: &str = "API_URL";
    pub const SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
    pub const AWS_REGION: &str = "AWS_REGION";
    pub const AWS_ACCOUNT_ID: &str = "AWS_ACCOUNT_ID";
    pub const ORDERED_APPROVALS: &str = "ORDERED_APPROVALS";
    pub const ENGINE_ENDPOINT: &str = "STEPGATE_ENGINE_ENDPOINT";
}

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load a file if present, defaults otherwise, then apply process
    /// environment overrides.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        let config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Config::default(),
            Err(e) => return Err(e),
        };
        Self::apply_env(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(config: Config) -> Result<Config, ConfigError> {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Unset keys leave the file
    /// value in place.
    pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(env_keys::API_URL) {
            config.notifier.callback_url = Some(v);
        }
        if let Some(v) = lookup(env_keys::SLACK_WEBHOOK_URL) {
            config.slack.webhook_url = Some(v);
        }
        if let Some(v) = lookup(env_keys::AWS_REGION) {
            config.engine.region = Some(v);
        }
        if let Some(v) = lookup(env_keys::AWS_ACCOUNT_ID) {
            config.engine.account_id = Some(v);
        }
        if let Some(v) = lookup(env_keys::ENGINE_ENDPOINT) {
            config.engine.endpoint = Some(v);
        }
        if let Some(v) = lookup(env_keys::ORDERED_APPROVALS) {
            config.gate.ordered_approvals = parse_bool(env_keys::ORDERED_APPROVALS, &v)?;
        }
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.stepgate`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.notifier.callback_url.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [server]
            host = "0.0.0.0"
            port = 3000

            [notifier]
            callback_url = "https://gate.example.com/decision"

            [gate]
            ordered_approvals = true
            max_listed_executions = 100

            [slack]
            webhook_url = "https://hooks.slack.com/services/T/B/X"
            timeout_seconds = 5

            [engine]
            region = "us-east-1"
            account_id = "123456789012"
            endpoint = "http://localhost:8083"

            [logging]
            level = "debug"
            file = false
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.notifier.callback_url().unwrap(), "https://gate.example.com/decision");
        assert!(config.gate.ordered_approvals);
        assert_eq!(config.gate.max_listed_executions, 100);
        assert_eq!(config.slack.timeout_seconds, 5);
        assert_eq!(config.engine.endpoint.as_deref(), Some("http://localhost:8083"));
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.file);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[engine]").unwrap();
        writeln!(file, "region = \"eu-west-1\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.engine.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/stepgate.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/stepgate.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_or_default_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server").unwrap();
        assert!(ConfigLoader::load_or_default(file.path()).is_err());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = ConfigLoader::load_str(
            r#"
            [engine]
            region = "eu-west-1"
            "#,
        )
        .unwrap();

        let config = ConfigLoader::apply_overrides(
            config,
            lookup_from(&[
                ("API_URL", "https://gate.example.com/decision"),
                ("SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/x"),
                ("AWS_REGION", "us-east-1"),
                ("AWS_ACCOUNT_ID", "123456789012"),
                ("STEPGATE_ENGINE_ENDPOINT", "http://localhost:8083"),
                ("ORDERED_APPROVALS", "yes"),
            ]),
        )
        .unwrap();

        assert_eq!(config.notifier.callback_url.as_deref(), Some("https://gate.example.com/decision"));
        assert_eq!(config.slack.webhook_url.as_deref(), Some("https://hooks.slack.com/services/x"));
        assert_eq!(config.engine.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.engine.account_id.as_deref(), Some("123456789012"));
        assert_eq!(config.engine.endpoint.as_deref(), Some("http://localhost:8083"));
        assert!(config.gate.ordered_approvals);
    }

    #[test]
    fn test_overrides_absent_keys_keep_file_values() {
        let config = ConfigLoader::load_str(
            r#"
            [gate]
            ordered_approvals = true
            "#,
        )
        .unwrap();
        let config = ConfigLoader::apply_overrides(config, lookup_from(&[])).unwrap();
        assert!(config.gate.ordered_approvals);
    }

    #[test]
    fn test_ordered_approvals_values() {
        for (raw, expected) in [("true", true), ("1", true), ("TRUE", true), ("false", false), ("0", false), ("", false)] {
            let config = ConfigLoader::apply_overrides(
                Config::default(),
                lookup_from(&[("ORDERED_APPROVALS", raw)]),
            )
            .unwrap();
            assert_eq!(config.gate.ordered_approvals, expected, "value {:?}", raw);
        }
    }

    #[test]
    fn test_ordered_approvals_invalid() {
        let result = ConfigLoader::apply_overrides(
            Config::default(),
            lookup_from(&[("ORDERED_APPROVALS", "maybe")]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "ORDERED_APPROVALS"
        ));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test-only variable name not read elsewhere
        unsafe {
            std::env::set_var("STEPGATE_TEST_WEBHOOK", "https://hooks.example.com/abc");
        }
        let config = ConfigLoader::load_str(
            r#"
            [slack]
            webhook_url = "${STEPGATE_TEST_WEBHOOK}"
            "#,
        )
        .unwrap();
        assert_eq!(config.slack.webhook_url.as_deref(), Some("https://hooks.example.com/abc"));
        unsafe {
            std::env::remove_var("STEPGATE_TEST_WEBHOOK");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${STEPGATE_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        assert_eq!(ConfigLoader::expand_env_vars(content).unwrap(), content);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(ConfigLoader::expand_path("/var/log/stepgate"), "/var/log/stepgate");
        let expanded = ConfigLoader::expand_path("~/.stepgate");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/.stepgate"));
    }
}
