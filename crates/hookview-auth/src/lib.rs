//! # hookview-auth
//!
//! Authenticity checks for inbound webhook deliveries.
//!
//! ## Modules
//!
//! - `secret`: the process-wide shared secret, never printed
//! - `signature`: HMAC-SHA256 signing and constant-time verification

pub mod secret;
pub mod signature;

pub use secret::SharedSecret;
pub use signature::{SignatureVerifier, sign, verify};
