//! Notify endpoint, called by the workflow when it reaches the approval step.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use stepgate_core::SuspendedExecutionEvent;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn notify(
    State(state): State<Arc<AppState>>,
    event: Result<Json<SuspendedExecutionEvent>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(event) = event.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    state.notifier.notify(&event).await?;
    Ok(StatusCode::NO_CONTENT)
}
