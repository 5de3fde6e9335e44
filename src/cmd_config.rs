//! `stepgate check-config`.

use std::path::Path;

use stepgate_config::{Config, ConfigValidator, ValidationResult};

type BoxError = Box<dyn std::error::Error>;

/// Render a validation result for the terminal.
pub(crate) fn render(path: &Path, result: &ValidationResult) -> String {
    let mut out = format!("Configuration: {}\n", path.display());
    for error in &result.errors {
        out.push_str(&format!("  error   {}: {}\n", error.path, error.message));
    }
    for warning in &result.warnings {
        out.push_str(&format!("  warning {}: {}\n", warning.path, warning.message));
    }
    if result.is_valid() {
        out.push_str("OK\n");
    }
    out
}

pub(crate) fn handle_check_config(path: &Path, config: &Config) -> Result<(), BoxError> {
    let result = ConfigValidator::validate(config)?;
    print!("{}", render(path, &result));
    if result.is_valid() {
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}
