//! Messages carried on the real-time channel.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": <payload>}`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use hookview_core::events::CapturedEvent;
use hookview_core::types::SubscriberId;

use crate::connection::handle::Frame;

/// Messages sent by the relay to viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// A relayed webhook delivery.
    NewWebhookData(CapturedEvent),
    /// Advisory status sent only to a newly connected viewer.
    ConnectionStatus(ConnectionStatus),
}

/// Payload of a `connectionStatus` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Status text, `"connected"` on registration.
    pub status: String,
    /// Subscriber id assigned by the relay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubscriberId>,
}

impl OutboundMessage {
    /// Status message greeting a newly registered subscriber.
    pub fn connected(id: SubscriberId) -> Self {
        Self::ConnectionStatus(ConnectionStatus {
            status: "connected".to_string(),
            id: Some(id),
        })
    }

    /// Serialize into a shareable text frame.
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        serde_json::to_string(self).map(Arc::from)
    }
}
