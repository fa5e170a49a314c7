//! # hookview-api
//!
//! HTTP layer for hookview built on Axum.
//!
//! Provides the signed webhook intake endpoint, the WebSocket upgrade for
//! viewers, health and metrics endpoints, middleware (CORS, compression,
//! request logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod relay;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use relay::{DeliveryOutcome, WebhookRelay};
pub use state::AppState;
