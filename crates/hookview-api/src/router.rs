//! Route definitions for the hookview HTTP API.
//!
//! The delivery and WebSocket paths come from configuration; health and
//! metrics live under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request-level middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let callback_path = state.config.webhook.callback_path.clone();
    let ws_path = state.config.realtime.ws_path.clone();

    Router::new()
        .route(&callback_path, post(handlers::webhook::receive_webhook))
        .route(&ws_path, get(handlers::ws::ws_upgrade))
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and counters
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/metrics", get(handlers::metrics::metrics))
}
