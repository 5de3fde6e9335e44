//! # stepgate core
//!
//! The two halves of the approval gate:
//!
//! - [`Notifier`] - turns a suspended execution into an operator message
//!   with approve/reject links
//! - [`DecisionGate`] - validates the operator's decision, optionally checks
//!   execution ordering, and signals the workflow engine
//!
//! The halves share no state; they meet only through the engine and the
//! channel. [`memory`] holds in-process implementations of both for tests
//! and dry runs.

pub mod error;
pub mod gate;
pub mod links;
pub mod memory;
pub mod message;
pub mod notifier;
pub mod ordering;

pub use error::{GateError, NotifyError};
pub use gate::{DecisionGate, DecisionParams, GateOutcome, GateSettings};
pub use links::DecisionLinks;
pub use memory::{
    EngineCall, MEMORY_ENGINE_ID, MemoryEngine, RECORDING_CHANNEL_ID, RecordingChannel,
};
pub use notifier::{Notifier, SuspendedExecutionEvent};
