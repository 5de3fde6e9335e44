//! Decision endpoint, the target of approve/reject links.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use stepgate_core::DecisionParams;

use crate::error::ApiError;
use crate::state::AppState;

/// Apply the decision and redirect the browser to the execution's console
/// page.
pub async fn decide(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DecisionParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let outcome = state.gate.decide(&params).await?;
    let location = location_header(outcome.redirect_url)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

fn location_header(url: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(url).map_err(|e| ApiError::InvalidRedirect(e.to_string()))
}
