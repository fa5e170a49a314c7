//! Individual subscriber connection handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hookview_core::types::SubscriberId;

/// Serialized outbound frame, shared between all recipients of a broadcast.
pub type Frame = Arc<str>;

/// Why a frame could not be queued for a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The subscriber's outbound queue is full.
    #[error("subscriber outbound queue is full")]
    Saturated,
    /// The subscriber's transport is gone.
    #[error("subscriber transport is closed")]
    Closed,
}

/// A handle to a single connected viewer.
///
/// Holds the sender half of the viewer's outbound queue. The transport
/// task owns the receiver and watches [`SubscriberHandle::closed`] so the
/// registry can tear it down.
#[derive(Debug)]
pub struct SubscriberHandle {
    /// Unique subscriber ID
    pub id: SubscriberId,
    /// When the subscriber connected
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<Frame>,
    closed: CancellationToken,
}

impl SubscriberHandle {
    /// Create a handle and the receiver its transport task drains.
    pub fn channel(buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        let handle = Arc::new(Self {
            id: SubscriberId::new(),
            connected_at: Utc::now(),
            sender: tx,
            closed: CancellationToken::new(),
        });
        (handle, rx)
    }

    /// Queue a frame without waiting.
    pub fn try_send(&self, frame: Frame) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendError::Saturated),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::Closed),
        }
    }

    /// Signal the transport task to shut down.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether the handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.sender.is_closed()
    }

    /// Token cancelled when the handle is closed.
    pub fn closed(&self) -> CancellationToken {
        self.closed.clone()
    }
}
