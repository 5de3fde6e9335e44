//! Application state.

use std::sync::Arc;

use stepgate_core::{DecisionGate, Notifier};

/// Application state shared across handlers. Immutable after startup.
pub struct AppState {
    pub gate: Arc<DecisionGate>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn new(gate: Arc<DecisionGate>, notifier: Arc<Notifier>) -> Self {
        Self { gate, notifier }
    }
}
