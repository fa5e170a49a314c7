//! Subscriber registry: the set of connected viewers and the fan-out primitive.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use hookview_core::types::SubscriberId;

use crate::message::OutboundMessage;
use crate::metrics::RelayMetrics;

use super::handle::{Frame, SendError, SubscriberHandle};

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    /// Subscribers the frame was queued for.
    pub delivered: usize,
    /// Subscribers that failed and were unregistered.
    pub dropped: usize,
}

/// Registry of all connected subscribers.
///
/// Membership only, no ordering. Safe for concurrent register,
/// unregister, and broadcast. Broadcast never waits on a subscriber.
#[derive(Debug)]
pub struct SubscriberRegistry {
    /// Subscriber ID → handle.
    subscribers: DashMap<SubscriberId, Arc<SubscriberHandle>>,
    /// Outbound queue size for subscribers created by [`Self::open`].
    buffer_size: usize,
    /// Metrics.
    metrics: Arc<RelayMetrics>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new(buffer_size: usize, metrics: Arc<RelayMetrics>) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer_size,
            metrics,
        }
    }

    /// Creates a subscriber handle and registers it.
    ///
    /// Returns the handle and the receiver the transport task drains.
    pub fn open(&self) -> (Arc<SubscriberHandle>, mpsc::Receiver<Frame>) {
        let (handle, rx) = SubscriberHandle::channel(self.buffer_size);
        self.register(handle.clone());
        (handle, rx)
    }

    /// Adds a subscriber and greets it with a `connectionStatus` message.
    ///
    /// The greeting goes to this subscriber only.
    pub fn register(&self, handle: Arc<SubscriberHandle>) {
        let id = handle.id;
        self.subscribers.insert(id, handle.clone());
        self.metrics.subscriber_connected();

        match OutboundMessage::connected(id).to_frame() {
            Ok(frame) => {
                if let Err(e) = handle.try_send(frame) {
                    debug!(subscriber_id = %id, error = %e, "Could not queue status greeting");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize status greeting"),
        }

        info!(subscriber_id = %id, total = self.subscribers.len(), "Subscriber registered");
    }

    /// Removes a subscriber and closes its handle.
    ///
    /// Idempotent: returns `false` if the subscriber was already gone.
    pub fn unregister(&self, id: &SubscriberId) -> bool {
        match self.subscribers.remove(id) {
            Some((_, handle)) => {
                handle.close();
                self.metrics.subscriber_disconnected();
                info!(subscriber_id = %id, total = self.subscribers.len(), "Subscriber unregistered");
                true
            }
            None => false,
        }
    }

    /// Delivers a message to every registered subscriber.
    ///
    /// Each subscriber is attempted independently. A subscriber whose
    /// transport is closed or whose queue is full is unregistered; the
    /// others still receive the message. With no subscribers this is a
    /// no-op.
    pub fn broadcast(&self, message: &OutboundMessage) -> BroadcastReport {
        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "Failed to serialize broadcast message");
                return BroadcastReport::default();
            }
        };
        self.broadcast_frame(frame)
    }

    /// Delivers an already serialized frame to every registered subscriber.
    pub fn broadcast_frame(&self, frame: Frame) -> BroadcastReport {
        // Snapshot first so no shard lock is held while unregistering.
        let targets: Vec<Arc<SubscriberHandle>> = self
            .subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();

        for handle in &targets {
            match handle.try_send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    match e {
                        SendError::Saturated => {
                            warn!(subscriber_id = %handle.id, "Subscriber queue full, disconnecting")
                        }
                        SendError::Closed => {
                            debug!(subscriber_id = %handle.id, "Subscriber transport closed")
                        }
                    }
                    failed.push(handle.id);
                }
            }
        }

        for id in &failed {
            if self.unregister(id) {
                report.dropped += 1;
            }
        }

        self.metrics.messages_sent(report.delivered as u64);
        self.metrics.messages_dropped(failed.len() as u64);

        report
    }

    /// Closes and removes every subscriber.
    pub fn close_all(&self) -> usize {
        let ids: Vec<SubscriberId> = self.subscribers.iter().map(|entry| *entry.key()).collect();
        let closed = ids.iter().filter(|id| self.unregister(id)).count();
        info!(count = closed, "All subscribers closed");
        closed
    }

    /// Whether a subscriber is registered.
    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.contains_key(id)
    }

    /// Returns the number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns whether no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
