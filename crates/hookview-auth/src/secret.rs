//! Shared secret used to key webhook signatures.

use std::fmt;

/// Opaque secret configured out-of-band.
///
/// Loaded once at startup and read-only thereafter. `Debug` never shows
/// the bytes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Secret bytes used as the HMAC key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether no secret was configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SharedSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for SharedSecret {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("SharedSecret(<unset>)")
        } else {
            f.write_str("SharedSecret([REDACTED])")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts() {
        let secret = SharedSecret::from("topsecret");
        assert_eq!(format!("{secret:?}"), "SharedSecret([REDACTED])");
        assert_eq!(format!("{:?}", SharedSecret::default()), "SharedSecret(<unset>)");
    }
}
