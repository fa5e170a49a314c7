//! Webhook intake: verify, parse, capture, broadcast.

use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{error, info, warn};

use hookview_auth::{SharedSecret, SignatureVerifier};
use hookview_core::config::WebhookConfig;
use hookview_core::events::CapturedEvent;
use hookview_realtime::{BroadcastReport, RealtimeEngine};

/// Result of handling one inbound delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Signature verified, payload parsed, event broadcast.
    Accepted {
        /// Id assigned to the captured event.
        event_id: String,
        /// Fan-out result.
        report: BroadcastReport,
    },
    /// Signature missing or wrong. Nothing was parsed or broadcast.
    Rejected,
    /// Signature verified but the body is not JSON.
    Malformed,
}

impl DeliveryOutcome {
    /// Whether the delivery was accepted.
    pub fn accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// HTTP status the delivery endpoint answers with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Accepted { .. } => StatusCode::OK,
            Self::Rejected => StatusCode::UNAUTHORIZED,
            Self::Malformed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Verifies inbound deliveries and publishes them to viewers.
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    verifier: SignatureVerifier,
    realtime: Arc<RealtimeEngine>,
}

impl WebhookRelay {
    /// Creates a relay publishing to `realtime`.
    pub fn new(verifier: SignatureVerifier, realtime: Arc<RealtimeEngine>) -> Self {
        Self { verifier, realtime }
    }

    /// Creates a relay keyed with the configured shared secret.
    pub fn from_config(config: &WebhookConfig, realtime: Arc<RealtimeEngine>) -> Self {
        let secret = SharedSecret::from(config.shared_secret.as_str());
        Self::new(SignatureVerifier::new(secret), realtime)
    }

    /// Handles one delivery.
    ///
    /// `raw_body` must be the exact bytes received. Nothing is parsed
    /// before the signature checks out, and payload contents are never
    /// logged.
    pub fn handle_delivery(&self, raw_body: &[u8], signature: Option<&str>) -> DeliveryOutcome {
        let metrics = &self.realtime.metrics;

        if !self.verifier.verify(raw_body, signature) {
            metrics.delivery_rejected();
            warn!(
                body_len = raw_body.len(),
                signature_present = signature.is_some_and(|s| !s.is_empty()),
                "Webhook signature rejected"
            );
            return DeliveryOutcome::Rejected;
        }

        let payload: serde_json::Value = match serde_json::from_slice(raw_body) {
            Ok(payload) => payload,
            Err(e) => {
                metrics.delivery_malformed();
                error!(
                    body_len = raw_body.len(),
                    line = e.line(),
                    column = e.column(),
                    "Verified webhook body is not valid JSON"
                );
                return DeliveryOutcome::Malformed;
            }
        };

        let event = CapturedEvent::relayed(payload);
        let event_id = event.id().to_string();
        let report = self.realtime.publish(event);
        metrics.delivery_accepted();

        info!(
            event_id = %event_id,
            body_len = raw_body.len(),
            subscribers = report.delivered,
            "Webhook delivery relayed"
        );

        DeliveryOutcome::Accepted { event_id, report }
    }
}
