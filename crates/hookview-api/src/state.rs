//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use hookview_core::config::AppConfig;
use hookview_realtime::RealtimeEngine;

use crate::relay::WebhookRelay;

/// Shared application state passed to every Axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Webhook intake
    pub relay: Arc<WebhookRelay>,
    /// Real-time subscriber channel
    pub realtime: Arc<RealtimeEngine>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds the relay and real-time engine from configuration.
    pub fn new(config: AppConfig) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        let relay = Arc::new(WebhookRelay::from_config(&config.webhook, realtime.clone()));

        Self {
            config: Arc::new(config),
            relay,
            realtime,
            started_at: Instant::now(),
        }
    }
}
