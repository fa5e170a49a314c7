//! Captured webhook events.
//!
//! A [`CapturedEvent`] is created either by the relay when a signed
//! delivery is accepted or locally when a viewer injects a test event.
//! Its fields are private so an event cannot change after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Names of the messages carried on the real-time channel.
pub mod wire {
    /// Server to viewer: a relayed delivery.
    pub const NEW_WEBHOOK_DATA: &str = "newWebhookData";
    /// Server to viewer: advisory status sent once after connecting.
    pub const CONNECTION_STATUS: &str = "connectionStatus";
}

/// A single webhook payload as shown to a viewer.
///
/// On the wire the fields are named `id`, `timestamp` and `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedEvent {
    id: String,
    #[serde(rename = "timestamp")]
    received_at: DateTime<Utc>,
    #[serde(rename = "data")]
    payload: serde_json::Value,
}

impl CapturedEvent {
    /// Create an event from its parts.
    pub fn new(id: impl Into<String>, received_at: DateTime<Utc>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            received_at,
            payload,
        }
    }

    /// Create an event for a delivery accepted by the relay right now.
    ///
    /// Ids are time-ordered UUIDs so they stay unique across retried
    /// deliveries of identical bytes.
    pub fn relayed(payload: serde_json::Value) -> Self {
        Self::new(Uuid::now_v7().to_string(), Utc::now(), payload)
    }

    /// Create an event with a generated id of the form `{prefix}-{uuid}`.
    pub fn with_generated_id(
        prefix: &str,
        received_at: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Self::new(format!("{prefix}-{}", Uuid::new_v4()), received_at, payload)
    }

    /// Unique event id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the event was received.
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// The webhook payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Consume the event, returning the payload.
    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }
}
