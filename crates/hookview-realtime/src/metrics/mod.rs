//! Relay metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Relay-level counters.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Deliveries that passed signature verification and were broadcast
    pub deliveries_accepted: AtomicU64,
    /// Deliveries rejected for a bad or missing signature
    pub deliveries_rejected: AtomicU64,
    /// Correctly signed deliveries whose body was not valid JSON
    pub deliveries_malformed: AtomicU64,
    /// Subscribers currently connected
    pub subscribers_active: AtomicU64,
    /// Subscribers ever connected
    pub subscribers_total: AtomicU64,
    /// Frames queued to subscribers
    pub messages_sent: AtomicU64,
    /// Frames dropped because a subscriber failed
    pub messages_dropped: AtomicU64,
}

impl RelayMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted delivery
    pub fn delivery_accepted(&self) {
        self.deliveries_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected delivery
    pub fn delivery_rejected(&self) {
        self.deliveries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a malformed delivery
    pub fn delivery_malformed(&self) {
        self.deliveries_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a new subscriber
    pub fn subscriber_connected(&self) {
        self.subscribers_total.fetch_add(1, Ordering::Relaxed);
        self.subscribers_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscriber leaving
    pub fn subscriber_disconnected(&self) {
        self.subscribers_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record frames queued
    pub fn messages_sent(&self, count: u64) {
        self.messages_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record frames dropped
    pub fn messages_dropped(&self, count: u64) {
        self.messages_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            deliveries_accepted: self.deliveries_accepted.load(Ordering::Relaxed),
            deliveries_rejected: self.deliveries_rejected.load(Ordering::Relaxed),
            deliveries_malformed: self.deliveries_malformed.load(Ordering::Relaxed),
            subscribers_active: self.subscribers_active.load(Ordering::Relaxed),
            subscribers_total: self.subscribers_total.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Deliveries accepted
    pub deliveries_accepted: u64,
    /// Deliveries rejected
    pub deliveries_rejected: u64,
    /// Deliveries with a valid signature but unparseable body
    pub deliveries_malformed: u64,
    /// Subscribers currently connected
    pub subscribers_active: u64,
    /// Subscribers ever connected
    pub subscribers_total: u64,
    /// Frames queued to subscribers
    pub messages_sent: u64,
    /// Frames dropped
    pub messages_dropped: u64,
}
