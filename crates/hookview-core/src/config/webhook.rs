//! Inbound webhook delivery configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default path the upstream platform delivers webhooks to.
pub const DEFAULT_CALLBACK_PATH: &str = "/api/webhook";

/// Default header carrying the base64 HMAC-SHA256 signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "X-Shopify-Hmac-SHA256";

/// Webhook endpoint and signature settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Path of the delivery endpoint.
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
    /// Name of the request header carrying the signature.
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
    /// Shared secret used to key the HMAC. Empty means "unset"; deliveries
    /// are still verified against it and will simply not match.
    #[serde(default, skip_serializing)]
    pub shared_secret: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            callback_path: default_callback_path(),
            signature_header: default_signature_header(),
            shared_secret: String::new(),
        }
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("callback_path", &self.callback_path)
            .field("signature_header", &self.signature_header)
            .field("shared_secret", &"[REDACTED]")
            .finish()
    }
}

fn default_callback_path() -> String {
    DEFAULT_CALLBACK_PATH.to_string()
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}
