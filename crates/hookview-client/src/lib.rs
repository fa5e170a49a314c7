//! # hookview-client
//!
//! Viewer side of the relay.
//!
//! - [`ClientConnectionManager`] keeps one logical connection to a relay
//!   with an explicit four-state machine, bounded retries, and guaranteed
//!   transport teardown.
//! - [`EventBuffer`] keeps the newest events, bounded.
//! - [`BackendTarget`] validates a backend URL and derives the relay
//!   endpoint and channel address from it.
//! - [`transport`] abstracts the duplex connection; the default
//!   implementation uses tokio-tungstenite.

pub mod buffer;
pub mod event;
pub mod manager;
pub mod state;
pub mod target;
pub mod transport;

pub use buffer::EventBuffer;
pub use event::InboundMessage;
pub use manager::{ClientConnectionManager, ClientEvent};
pub use state::ConnectionState;
pub use target::BackendTarget;
pub use transport::{Connector, Transport, TransportError, WebSocketConnector};
