//! Top-level real-time engine that ties the subscriber channel together.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use hookview_core::config::RealtimeConfig;
use hookview_core::events::CapturedEvent;

use crate::connection::heartbeat::Heartbeat;
use crate::connection::registry::{BroadcastReport, SubscriberRegistry};
use crate::message::OutboundMessage;
use crate::metrics::RelayMetrics;

/// Central real-time engine shared by the HTTP handlers.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Subscriber registry.
    pub registry: Arc<SubscriberRegistry>,
    /// Metrics collector.
    pub metrics: Arc<RelayMetrics>,
    /// Channel settings.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("subscribers", &self.registry.len())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RelayMetrics::new());
        let registry = Arc::new(SubscriberRegistry::new(
            config.channel_buffer_size,
            metrics.clone(),
        ));

        info!(
            buffer_size = config.channel_buffer_size,
            "Real-time engine initialized"
        );

        Self {
            registry,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Broadcasts a captured event as `newWebhookData` to every subscriber.
    pub fn publish(&self, event: CapturedEvent) -> BroadcastReport {
        let event_id = event.id().to_string();
        let report = self
            .registry
            .broadcast(&OutboundMessage::NewWebhookData(event));
        debug!(
            event_id = %event_id,
            delivered = report.delivered,
            dropped = report.dropped,
            "Event broadcast"
        );
        report
    }

    /// Fresh heartbeat for a new subscriber connection.
    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat::from_config(&self.config)
    }

    /// Channel settings.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");

        // Signal all tasks to stop
        let _ = self.shutdown_tx.send(());

        let closed = self.registry.close_all();

        info!(closed, "Real-time engine shut down");
    }
}
