//! Subscriber connection management: handles, registry, heartbeat.

pub mod handle;
pub mod heartbeat;
pub mod registry;

pub use handle::{SendError, SubscriberHandle};
pub use heartbeat::Heartbeat;
pub use registry::SubscriberRegistry;
