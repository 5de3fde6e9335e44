//! Health check handlers.

use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use stepgate_core::{MEMORY_ENGINE_ID, RECORDING_CHANNEL_ID};

use crate::state::AppState;

/// Health status. `Degraded` means a component is an in-memory stand-in
/// (`--dry-run`), so decisions never reach a real engine or channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether decisions wait for earlier executions.
    pub ordered_approvals: bool,
    pub components: Vec<ComponentHealth>,
}

/// Component health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static START_TIME: OnceLock<SystemTime> = OnceLock::new();

/// Initialize start time (call on server start).
pub fn init_start_time() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime() -> u64 {
    START_TIME
        .get()
        .and_then(|start| start.elapsed().ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let gate = &state.gate;
    let components = vec![
        component("engine", gate.engine_id(), MEMORY_ENGINE_ID),
        component("channel", gate.channel_id(), RECORDING_CHANNEL_ID),
    ];
    let status = if components.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: get_uptime(),
        ordered_approvals: gate.settings().ordered_approvals,
        components,
    })
}

fn component(name: &str, id: &str, stand_in_id: &str) -> ComponentHealth {
    let status = if id == stand_in_id {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };
    ComponentHealth {
        name: name.to_string(),
        status,
        message: Some(id.to_string()),
    }
}

/// Liveness probe.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}
