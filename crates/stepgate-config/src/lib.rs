//! # stepgate Config
//!
//! Configuration for the approval gate: a TOML file with `${VAR}`
//! expansion, overlaid with the environment variables the deployed
//! handlers have always read (`API_URL`, `SLACK_WEBHOOK_URL`, ...).

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigLoader, env_keys};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
