//! Watch a relay and print events as they arrive.

use std::future::Future;
use std::sync::Arc;

use clap::Args;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use hookview_client::{ClientConnectionManager, ClientEvent, ConnectionState, WebSocketConnector};
use hookview_core::config::AppConfig;
use hookview_core::error::AppError;
use hookview_core::samples::TestEventKind;

use crate::output::{self, OutputFormat};

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Relay base URL, e.g. http://localhost:3001
    pub backend_url: String,

    /// Inject a local test event once connected
    #[arg(long)]
    pub inject: Option<TestEventKind>,
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let manager = ClientConnectionManager::with_paths(
        config.client.clone(),
        Arc::new(WebSocketConnector),
        config.webhook.callback_path.clone(),
        config.realtime.ws_path.clone(),
    );

    let states = manager.subscribe_state();
    let events = manager.subscribe_events();

    manager.connect(&args.backend_url)?;
    if let Some(target) = manager.target() {
        output::print_kv("Webhook endpoint", target.webhook_endpoint().as_str());
        output::print_kv("Channel", target.channel_url().as_str());
    }

    let result = watch_until(
        &manager,
        states,
        events,
        args.inject,
        format,
        tokio::signal::ctrl_c(),
    )
    .await;

    manager.disconnect().await;
    info!(buffered = manager.events().len(), "Watch finished");
    result
}

/// Renders state changes and events until `shutdown` resolves or the session ends.
///
/// `shutdown` is polled across iterations, so a signal that fires while
/// another branch is being handled is still observed.
async fn watch_until<F: Future>(
    manager: &ClientConnectionManager,
    mut states: watch::Receiver<ConnectionState>,
    mut events: broadcast::Receiver<ClientEvent>,
    inject: Option<TestEventKind>,
    format: OutputFormat,
    shutdown: F,
) -> Result<(), AppError> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => return Ok(()),
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = *states.borrow_and_update();
                debug!(state = %state, "Viewer state changed");
                output::print_state(state);
                match state {
                    ConnectionState::Connected => {
                        if let Some(kind) = inject {
                            manager.inject_test_event(kind);
                        }
                    }
                    ConnectionState::Error => {
                        let reason = manager
                            .last_error()
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "unknown error".to_string());
                        warn!(error = %reason, "Giving up on relay");
                        return Err(AppError::transport(format!("Could not connect: {}", reason)));
                    }
                    ConnectionState::Disconnected => return Ok(()),
                    ConnectionState::Connecting => {}
                }
            }
            event = events.recv() => match event {
                Ok(ClientEvent::Received(event)) | Ok(ClientEvent::Injected(event)) => {
                    output::print_event(&event, format);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event output lagged behind the relay");
                    output::print_warning(&format!("Skipped {} events", skipped));
                }
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}
