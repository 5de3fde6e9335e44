//! # stepgate Protocols
//!
//! Shared vocabulary for the approval gate: execution identities, the
//! operator's decision, and the two traits every backend implements.
//!
//! ## Core Traits
//!
//! - [`WorkflowEngine`](engine::WorkflowEngine): signal success/failure for a
//!   resume token and list executions of a state machine
//! - [`NotificationChannel`](channel::NotificationChannel): deliver a
//!   structured message to a human operator

pub mod channel;
pub mod decision;
pub mod engine;
pub mod error;
pub mod execution;
pub mod identity;

pub use channel::{ActionButton, ButtonStyle, NotificationChannel, NotificationMessage};
pub use decision::{Decision, ParseDecisionError};
pub use engine::{TaskFailure, WorkflowEngine};
pub use error::{ChannelError, EngineError, IdentityError};
pub use execution::{ExecutionRecord, ExecutionStatus};
pub use identity::{ExecutionId, StateMachineId};
