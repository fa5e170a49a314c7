//! Ping/pong heartbeat bookkeeping for WebSocket keepalive.

use std::time::Duration;

use tokio::time::Instant;

use hookview_core::config::RealtimeConfig;

/// Tracks when a subscriber was last heard from.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Silence after which the subscriber is considered dead
    pub ping_timeout: Duration,
    last_seen: Instant,
}

impl Heartbeat {
    /// Create a heartbeat starting now.
    pub fn new(ping_interval: Duration, ping_timeout: Duration) -> Self {
        Self {
            ping_interval,
            ping_timeout,
            last_seen: Instant::now(),
        }
    }

    /// Create a heartbeat from configuration.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ping_interval_seconds.max(1)),
            Duration::from_secs(config.ping_timeout_seconds.max(1)),
        )
    }

    /// Record any frame from the subscriber, pong or otherwise.
    pub fn record_activity(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Whether the subscriber has been silent longer than the timeout.
    pub fn is_expired(&self) -> bool {
        self.last_seen.elapsed() > self.ping_timeout
    }

    /// Time since the subscriber was last heard from.
    pub fn silence(&self) -> Duration {
        self.last_seen.elapsed()
    }
}
