//! Webhook signature computation and verification.

pub mod verifier;

pub use verifier::{SignatureVerifier, sign, verify};
