//! Approve/reject links embedded in operator messages.

use stepgate_protocols::{Decision, ExecutionId};
use url::Url;

/// Query parameter names understood by the decision endpoint.
pub mod params {
    pub const EXECUTION_NAME: &str = "execution_name";
    pub const TOKEN: &str = "token";
    pub const STATE_MACHINE_NAME: &str = "state_machine_name";
    pub const ACTION: &str = "action";
}

/// The pair of links offered to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionLinks {
    pub approve: String,
    pub reject: String,
}

impl DecisionLinks {
    /// Build both links from the callback base URL.
    ///
    /// Parameters are form-urlencoded and appended after any query the base
    /// URL already carries.
    pub fn build(base: &Url, execution: &ExecutionId, token: &str) -> Self {
        Self {
            approve: decision_link(base, execution, token, Decision::Approve),
            reject: decision_link(base, execution, token, Decision::Reject),
        }
    }
}

/// One decision link.
pub fn decision_link(base: &Url, execution: &ExecutionId, token: &str, decision: Decision) -> String {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair(params::EXECUTION_NAME, &execution.name)
        .append_pair(params::TOKEN, token)
        .append_pair(params::STATE_MACHINE_NAME, execution.state_machine_name())
        .append_pair(params::ACTION, decision.as_str());
    url.into()
}
