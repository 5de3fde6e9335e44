//! State machine and execution identities.
//!
//! Step Functions names everything with colon-delimited ARNs:
//!
//! ```text
//! arn:aws:states:us-east-1:123456789012:stateMachine:deploy-pipeline
//! arn:aws:states:us-east-1:123456789012:execution:deploy-pipeline:run-42
//! ```
//!
//! The parsers here check the segment count, prefix, service and resource
//! type instead of indexing blindly, so a malformed identifier becomes an
//! [`IdentityError`] rather than a wrong name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

/// Partition used when identities are rebuilt from names.
pub const DEFAULT_PARTITION: &str = "aws";

const SERVICE: &str = "states";
const STATE_MACHINE_RESOURCE: &str = "stateMachine";
const EXECUTION_RESOURCE: &str = "execution";
const STATE_MACHINE_SEGMENTS: usize = 7;
const EXECUTION_SEGMENTS: usize = 8;

const CONSOLE_URL: &str = "https://console.aws.amazon.com/states/home";

/// A workflow (state machine) identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateMachineId {
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub name: String,
}

impl StateMachineId {
    /// Build an identity in the default partition.
    pub fn new(
        region: impl Into<String>,
        account_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            partition: DEFAULT_PARTITION.to_string(),
            region: region.into(),
            account_id: account_id.into(),
            name: name.into(),
        }
    }

    /// Parse `arn:<partition>:states:<region>:<account>:stateMachine:<name>`.
    pub fn parse(arn: &str) -> Result<Self, IdentityError> {
        let segments = split_arn(arn, STATE_MACHINE_RESOURCE, STATE_MACHINE_SEGMENTS)?;
        Ok(Self {
            partition: segments[1].to_string(),
            region: segments[3].to_string(),
            account_id: segments[4].to_string(),
            name: segments[6].to_string(),
        })
    }

    /// Fully-qualified identifier.
    pub fn arn(&self) -> String {
        format!(
            "arn:{}:{}:{}:{}:{}:{}",
            self.partition, SERVICE, self.region, self.account_id, STATE_MACHINE_RESOURCE, self.name
        )
    }

    /// Identity of one execution of this state machine.
    pub fn execution(&self, name: impl Into<String>) -> ExecutionId {
        ExecutionId {
            state_machine: self.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for StateMachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}

impl FromStr for StateMachineId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One execution of a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutionId {
    pub state_machine: StateMachineId,
    pub name: String,
}

impl ExecutionId {
    pub fn new(
        region: impl Into<String>,
        account_id: impl Into<String>,
        state_machine_name: impl Into<String>,
        execution_name: impl Into<String>,
    ) -> Self {
        StateMachineId::new(region, account_id, state_machine_name).execution(execution_name)
    }

    /// Parse `arn:<partition>:states:<region>:<account>:execution:<machine>:<name>`.
    pub fn parse(arn: &str) -> Result<Self, IdentityError> {
        let segments = split_arn(arn, EXECUTION_RESOURCE, EXECUTION_SEGMENTS)?;
        Ok(Self {
            state_machine: StateMachineId {
                partition: segments[1].to_string(),
                region: segments[3].to_string(),
                account_id: segments[4].to_string(),
                name: segments[6].to_string(),
            },
            name: segments[7].to_string(),
        })
    }

    /// Fully-qualified identifier.
    pub fn arn(&self) -> String {
        let sm = &self.state_machine;
        format!(
            "arn:{}:{}:{}:{}:{}:{}:{}",
            sm.partition, SERVICE, sm.region, sm.account_id, EXECUTION_RESOURCE, sm.name, self.name
        )
    }

    /// Name of the owning state machine.
    pub fn state_machine_name(&self) -> &str {
        &self.state_machine.name
    }

    /// The engine console's detail page for this execution.
    ///
    /// A pure function of region and identity.
    pub fn console_url(&self) -> String {
        format!(
            "{}?region={}#/executions/details/{}",
            CONSOLE_URL,
            self.state_machine.region,
            self.arn()
        )
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn())
    }
}

impl FromStr for ExecutionId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn split_arn<'a>(
    arn: &'a str,
    resource: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>, IdentityError> {
    let segments: Vec<&str> = arn.split(':').collect();

    if segments[0] != "arn" {
        return Err(IdentityError::NotAnArn(arn.to_string()));
    }
    if segments.len() != expected {
        return Err(IdentityError::SegmentCount {
            arn: arn.to_string(),
            expected,
            found: segments.len(),
        });
    }
    if segments[2] != SERVICE {
        return Err(IdentityError::WrongService {
            arn: arn.to_string(),
            service: segments[2].to_string(),
        });
    }
    if segments[5] != resource {
        return Err(IdentityError::WrongResource {
            arn: arn.to_string(),
            expected: resource,
            found: segments[5].to_string(),
        });
    }
    if let Some(position) = segments.iter().position(|s| s.is_empty()) {
        return Err(IdentityError::EmptySegment {
            arn: arn.to_string(),
            position,
        });
    }

    Ok(segments)
}
