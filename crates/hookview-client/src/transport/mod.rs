//! Duplex transport abstraction.
//!
//! The manager only needs "open a connection" and "read the next text
//! frame"; [`websocket`] provides the real implementation.

pub mod websocket;

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

pub use websocket::WebSocketConnector;

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("connect failed: {0}")]
    Connect(String),
    /// The attempt did not resolve in time.
    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
    /// Reading from an open connection failed.
    #[error("receive failed: {0}")]
    Receive(String),
}

/// An open connection to the relay.
#[async_trait]
pub trait Transport: Send {
    /// Next text frame, or `None` once the peer has closed.
    async fn recv(&mut self) -> Option<Result<String, TransportError>>;

    /// Closes the connection. Safe to call more than once.
    async fn close(&mut self);
}

/// Opens transports.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Opens a connection to `url`.
    async fn connect(&self, url: &Url) -> Result<Box<dyn Transport>, TransportError>;
}
