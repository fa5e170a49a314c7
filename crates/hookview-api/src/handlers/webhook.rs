//! Webhook delivery endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use hookview_core::error::AppError;

use crate::dto::response::DeliveryAck;
use crate::error::ApiError;
use crate::relay::DeliveryOutcome;
use crate::state::AppState;

/// Static body for signature failures.
pub const REJECTION_BODY: &str = "Invalid webhook signature";

/// POST {callback_path}
///
/// The body is taken as raw bytes so the signature is checked against
/// exactly what was sent.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let signature = headers
        .get(state.config.webhook.signature_header.as_str())
        .and_then(|value| value.to_str().ok());

    match state.relay.handle_delivery(&body, signature) {
        DeliveryOutcome::Accepted { .. } => {
            Ok((StatusCode::OK, Json(DeliveryAck { received: true })).into_response())
        }
        DeliveryOutcome::Rejected => Ok((StatusCode::UNAUTHORIZED, REJECTION_BODY).into_response()),
        DeliveryOutcome::Malformed => Err(AppError::internal(
            "Webhook payload could not be parsed after signature verification",
        )
        .into()),
    }
}
