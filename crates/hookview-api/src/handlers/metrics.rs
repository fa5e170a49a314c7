//! Relay counters.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, MetricsResponse};
use crate::state::AppState;

/// GET /api/metrics
pub async fn metrics(State(state): State<AppState>) -> Json<ApiResponse<MetricsResponse>> {
    Json(ApiResponse::ok(state.realtime.metrics.snapshot()))
}
