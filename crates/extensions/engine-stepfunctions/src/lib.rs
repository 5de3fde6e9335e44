//! # stepgate Engine - Step Functions
//!
//! [`WorkflowEngine`] over the AWS Step Functions JSON 1.0 protocol: every
//! operation is a `POST /` whose `X-Amz-Target` header names the action.
//! Requests are SigV4-signed when credentials are available and sent
//! unsigned otherwise, which suits local emulators.

mod model;
pub mod sigv4;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use stepgate_protocols::{
    EngineError, ExecutionRecord, StateMachineId, TaskFailure, WorkflowEngine,
};

use model::{
    ErrorBody, ListExecutionsInput, ListExecutionsOutput, SendTaskFailureInput,
    SendTaskSuccessInput,
};
pub use sigv4::Credentials;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

const CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const TARGET_PREFIX: &str = "AWSStepFunctions";
const SERVICE: &str = "states";

/// Step Functions client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFunctionsConfig {
    pub region: String,
    /// Overrides `https://states.<region>.amazonaws.com`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl StepFunctionsConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            timeout_seconds: default_timeout(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Endpoint the client talks to.
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.{}.amazonaws.com", SERVICE, self.region))
    }
}

/// Step Functions engine client.
pub struct StepFunctionsEngine {
    config: StepFunctionsConfig,
    endpoint: Url,
    host: String,
    client: Client,
    credentials: Option<Credentials>,
}

impl StepFunctionsEngine {
    /// Create a client; credentials are not loaded.
    pub fn new(config: StepFunctionsConfig) -> Result<Self, EngineError> {
        let raw = config.endpoint_url();
        let endpoint = Url::parse(&raw)
            .map_err(|e| EngineError::Network(format!("Invalid endpoint '{}': {}", raw, e)))?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(EngineError::Network(format!("Endpoint '{}' has no host", raw)));
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| EngineError::Network(e.to_string()))?;

        Ok(Self {
            config,
            endpoint,
            host,
            client,
            credentials: None,
        })
    }

    /// Create a client that signs with credentials from the environment
    /// when present.
    pub fn from_env(config: StepFunctionsConfig) -> Result<Self, EngineError> {
        Ok(Self::new(config)?.with_credentials(Credentials::from_env()))
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn is_signing(&self) -> bool {
        self.credentials.is_some()
    }

    async fn call<T: Serialize>(&self, operation: &str, input: &T) -> Result<Value, EngineError> {
        let body = serde_json::to_vec(input)
            .map_err(|e| EngineError::InvalidResponse(format!("Unserializable input: {}", e)))?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        debug!("Calling {} at {}", target, self.endpoint);

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", CONTENT_TYPE)
            .header("X-Amz-Target", &target);

        if let Some(ref credentials) = self.credentials {
            let signed = sigv4::sign(
                credentials,
                &self.config.region,
                SERVICE,
                &sigv4::SigningRequest {
                    host: &self.host,
                    path: self.endpoint.path(),
                    content_type: CONTENT_TYPE,
                    target: &target,
                    body: &body,
                },
                Utc::now(),
            );
            request = request
                .header("X-Amz-Date", signed.amz_date)
                .header("Authorization", signed.authorization);
            if let Some(token) = signed.security_token {
                request = request.header("X-Amz-Security-Token", token);
            }
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&text).map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

/// Map an error response onto the closed error set.
fn error_from_response(status: u16, body: &str) -> EngineError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            kind: Some(kind),
            message,
        }) => EngineError::from_error_code(&kind, message.unwrap_or_default()),
        _ => EngineError::Api {
            code: format!("HTTP {}", status),
            message: body.to_string(),
        },
    }
}

#[async_trait]
impl WorkflowEngine for StepFunctionsEngine {
    fn id(&self) -> &str {
        "stepfunctions"
    }

    async fn send_task_success(&self, token: &str, output: &Value) -> Result<(), EngineError> {
        let input = SendTaskSuccessInput {
            task_token: token,
            output: output.to_string(),
        };
        self.call("SendTaskSuccess", &input).await?;
        Ok(())
    }

    async fn send_task_failure(
        &self,
        token: &str,
        failure: &TaskFailure,
    ) -> Result<(), EngineError> {
        let input = SendTaskFailureInput {
            task_token: token,
            error: &failure.error,
            cause: &failure.cause,
        };
        self.call("SendTaskFailure", &input).await?;
        Ok(())
    }

    async fn list_executions(
        &self,
        state_machine: &StateMachineId,
        max_results: u32,
    ) -> Result<Vec<ExecutionRecord>, EngineError> {
        let input = ListExecutionsInput {
            state_machine_arn: state_machine.arn(),
            max_results,
        };
        let value = self.call("ListExecutions", &input).await?;
        let output: ListExecutionsOutput = serde_json::from_value(value)
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
        output
            .executions
            .into_iter()
            .map(|item| item.into_record())
            .collect()
    }
}
