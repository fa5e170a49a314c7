//! Viewer-side connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of events a viewer keeps, newest first.
pub const DEFAULT_BUFFER_CAPACITY: usize = 50;

/// Upper bound on retries after the first connect attempt.
pub const MAX_RECONNECTION_ATTEMPTS: u32 = 10;

/// Client connection manager configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout for a single connection attempt, in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Automatic retries after the first failed attempt before surfacing
    /// the error state.
    #[serde(default = "default_reconnection_attempts")]
    pub reconnection_attempts: u32,
    /// Delay before the first retry, in milliseconds. Doubles per retry.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Upper bound for the retry delay, in milliseconds.
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// Capacity of the event buffer.
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            reconnection_attempts: default_reconnection_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl ClientConfig {
    /// Connection attempt timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        let delay = self.initial_backoff_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }
}

fn default_connect_timeout() -> u64 {
    10_000
}

fn default_reconnection_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    500
}

fn default_max_backoff() -> u64 {
    5_000
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}
