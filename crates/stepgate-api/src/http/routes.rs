//! HTTP route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::{decision, monitoring, notify};
use crate::state::AppState;

/// Path of the decision endpoint; the notifier's callback URL points here.
pub const DECISION_PATH: &str = "/decision";

/// Create the router.
///
/// ```text
/// GET  /decision  - Apply an approve/reject link
/// POST /notify    - Announce a suspended execution
/// GET  /health    - Health report
/// GET  /livez     - Liveness probe
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let gate_routes = Router::new()
        .route(DECISION_PATH, get(decision::decide))
        .route("/notify", post(notify::notify))
        .route("/health", get(monitoring::health_check))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    Router::new()
        .merge(gate_routes)
        .merge(liveness_route)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
