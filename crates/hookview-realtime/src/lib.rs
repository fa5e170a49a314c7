//! # hookview-realtime
//!
//! Real-time fan-out of relayed webhook deliveries to connected viewers.
//! Provides:
//!
//! - Subscriber handles with bounded, non-blocking outbound queues
//! - A concurrent subscriber registry with best-effort broadcast
//! - The JSON wire messages carried on the channel
//! - Ping/pong heartbeat bookkeeping
//! - Relay counters

pub mod connection;
pub mod message;
pub mod metrics;
pub mod server;

pub use connection::handle::SubscriberHandle;
pub use connection::registry::{BroadcastReport, SubscriberRegistry};
pub use message::OutboundMessage;
pub use metrics::RelayMetrics;
pub use server::RealtimeEngine;
