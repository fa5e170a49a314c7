//! HMAC-SHA256 webhook signatures, base64 encoded.
//!
//! The digest is always computed over the exact bytes received, before
//! any JSON parsing, and compared in constant time.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use hookview_core::error::AppError;

use crate::secret::SharedSecret;

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64 HMAC-SHA256 of `raw_body` keyed with `secret`.
///
/// An empty secret is a valid key and yields a deterministic digest.
pub fn sign(raw_body: &[u8], secret: &[u8]) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(raw_body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Whether `provided_signature` is the signature of `raw_body` under `secret`.
///
/// A missing or empty signature is always rejected.
pub fn verify(raw_body: &[u8], provided_signature: &str, secret: &[u8]) -> bool {
    if provided_signature.is_empty() {
        return false;
    }

    let expected = match sign(raw_body, secret) {
        Ok(digest) => digest,
        Err(e) => {
            tracing::error!(error = %e, "Failed to compute webhook digest");
            return false;
        }
    };

    expected
        .as_bytes()
        .ct_eq(provided_signature.as_bytes())
        .into()
}

/// Verifies deliveries against the process-wide shared secret.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: SharedSecret,
}

impl SignatureVerifier {
    /// Creates a verifier for the given secret.
    pub fn new(secret: SharedSecret) -> Self {
        if secret.is_empty() {
            tracing::warn!("Webhook shared secret is not set; no delivery will verify");
        }
        Self { secret }
    }

    /// Checks a delivery's signature header value.
    pub fn verify(&self, raw_body: &[u8], provided_signature: Option<&str>) -> bool {
        match provided_signature {
            Some(signature) => verify(raw_body, signature, self.secret.as_bytes()),
            None => false,
        }
    }

    /// Signs a body with this verifier's secret.
    pub fn sign(&self, raw_body: &[u8]) -> Result<String, AppError> {
        sign(raw_body, self.secret.as_bytes())
    }
}
