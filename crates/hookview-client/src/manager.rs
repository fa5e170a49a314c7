//! Client connection manager.
//!
//! Owns at most one session task per manager. Every connect intent bumps a
//! generation counter; callbacks from a session whose generation is no
//! longer current are ignored and the session tears its transport down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use hookview_core::config::ClientConfig;
use hookview_core::config::webhook::DEFAULT_CALLBACK_PATH;
use hookview_core::error::AppError;
use hookview_core::events::CapturedEvent;
use hookview_core::samples::TestEventKind;

use crate::buffer::EventBuffer;
use crate::event::InboundMessage;
use crate::state::{ConnectionState, Trigger};
use crate::target::{BackendTarget, DEFAULT_WS_PATH};
use crate::transport::{Connector, Transport, TransportError, WebSocketConnector};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notifications for hosts rendering the buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// An event arrived from the relay and was buffered.
    Received(CapturedEvent),
    /// A local test event was buffered.
    Injected(CapturedEvent),
    /// The buffer was cleared.
    Cleared,
    /// Connecting failed after all retries.
    Failed(TransportError),
}

/// Keeps one logical connection to a relay.
///
/// State is observable with [`Self::subscribe_state`]; buffered events
/// with [`Self::events`] and [`Self::subscribe_events`]. Dropping the
/// manager cancels its session and releases the transport.
pub struct ClientConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    callback_path: String,
    ws_path: String,
    control: Mutex<Control>,
    buffer: Mutex<EventBuffer>,
    state_tx: watch::Sender<ConnectionState>,
    events_tx: broadcast::Sender<ClientEvent>,
}

#[derive(Default)]
struct Control {
    generation: u64,
    session: Option<Session>,
    target: Option<BackendTarget>,
    last_error: Option<TransportError>,
    subscriber_id: Option<String>,
}

struct Session {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ClientConnectionManager {
    /// Creates a manager using `connector` and the default relay paths.
    pub fn new(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        Self::with_paths(config, connector, DEFAULT_CALLBACK_PATH, DEFAULT_WS_PATH)
    }

    /// Creates a manager that talks WebSocket.
    pub fn websocket(config: ClientConfig) -> Self {
        Self::new(config, Arc::new(WebSocketConnector))
    }

    /// Creates a manager for a relay serving non-default paths.
    pub fn with_paths(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        callback_path: impl Into<String>,
        ws_path: impl Into<String>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let buffer = EventBuffer::new(config.buffer_capacity);

        Self {
            inner: Arc::new(Inner {
                config,
                connector,
                callback_path: callback_path.into(),
                ws_path: ws_path.into(),
                control: Mutex::new(Control::default()),
                buffer: Mutex::new(buffer),
                state_tx,
                events_tx,
            }),
        }
    }

    /// Starts connecting to the relay at `backend_url`.
    ///
    /// Returns once the attempt is under way; watch the state for the
    /// outcome. A no-op while connecting or connected. An invalid URL is
    /// rejected here with a validation error and the state is left as is.
    pub fn connect(&self, backend_url: &str) -> Result<(), AppError> {
        let inner = &self.inner;
        let mut control = lock(&inner.control);

        let current = inner.state();
        if matches!(current, ConnectionState::Connecting | ConnectionState::Connected) {
            debug!(state = %current, "Connect ignored, a session is already active");
            return Ok(());
        }

        let target = BackendTarget::with_paths(backend_url, &inner.callback_path, &inner.ws_path)?;

        if let Some(previous) = control.session.take() {
            previous.cancel.cancel();
        }

        control.generation += 1;
        let generation = control.generation;
        control.target = Some(target.clone());
        control.last_error = None;
        control.subscriber_id = None;
        inner.transition(Trigger::ConnectIntent);

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_session(
            Arc::clone(inner),
            generation,
            target.channel_url().clone(),
            cancel.clone(),
        ));
        control.session = Some(Session { cancel, task });

        info!(channel = %target.channel_url(), generation, "Connecting to relay");
        Ok(())
    }

    /// Disconnects and waits until the transport is released.
    pub async fn disconnect(&self) {
        let session = {
            let mut control = lock(&self.inner.control);
            control.generation += 1;
            self.inner.transition(Trigger::DisconnectIntent);
            control.session.take()
        };

        if let Some(session) = session {
            session.cancel.cancel();
            if let Err(e) = session.task.await {
                warn!(error = %e, "Session task ended abnormally");
            }
            info!("Disconnected from relay");
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    /// Receiver that sees every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    /// Receiver for buffer notifications.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Buffered events, newest first.
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.inner.buffer).snapshot()
    }

    /// Empties the buffer. The connection is not affected.
    pub fn clear(&self) {
        lock(&self.inner.buffer).clear();
        let _ = self.inner.events_tx.send(ClientEvent::Cleared);
    }

    /// Buffers a local sample event without touching the network.
    pub fn inject_test_event(&self, kind: TestEventKind) -> CapturedEvent {
        let event = kind.to_local_event(Utc::now());
        lock(&self.inner.buffer).push(event.clone());
        let _ = self.inner.events_tx.send(ClientEvent::Injected(event.clone()));
        debug!(kind = %kind, event_id = %event.id(), "Injected local test event");
        event
    }

    /// Target of the latest connect intent.
    pub fn target(&self) -> Option<BackendTarget> {
        lock(&self.inner.control).target.clone()
    }

    /// Why the last session ended in `Error`.
    pub fn last_error(&self) -> Option<TransportError> {
        lock(&self.inner.control).last_error.clone()
    }

    /// Subscriber id the relay announced for the current session.
    pub fn subscriber_id(&self) -> Option<String> {
        lock(&self.inner.control).subscriber_id.clone()
    }
}

impl Drop for ClientConnectionManager {
    fn drop(&mut self) {
        let mut control = lock(&self.inner.control);
        control.generation += 1;
        self.inner.transition(Trigger::DisconnectIntent);
        if let Some(session) = control.session.take() {
            session.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for ClientConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConnectionManager")
            .field("state", &self.state())
            .finish()
    }
}

impl Inner {
    fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Applies `trigger`. Callers hold the control lock.
    fn transition(&self, trigger: Trigger) -> bool {
        let mut applied = false;
        self.state_tx.send_if_modified(|state| match state.next(trigger) {
            Some(next) => {
                applied = true;
                let changed = *state != next;
                *state = next;
                changed
            }
            None => false,
        });
        applied
    }

    /// Whether the session of `generation` may go live.
    fn opened(&self, generation: u64) -> bool {
        let control = lock(&self.control);
        control.generation == generation && self.transition(Trigger::Opened)
    }

    fn failed(&self, generation: u64, error: TransportError) {
        let mut control = lock(&self.control);
        if control.generation != generation || !self.transition(Trigger::Failed) {
            return;
        }
        warn!(error = %error, "Could not connect to relay");
        control.last_error = Some(error.clone());
        let _ = self.events_tx.send(ClientEvent::Failed(error));
    }

    fn dropped(&self, generation: u64) {
        let mut control = lock(&self.control);
        if control.generation != generation || !self.transition(Trigger::Dropped) {
            return;
        }
        control.session = None;
        control.subscriber_id = None;
        info!("Relay connection dropped");
    }

    fn handle_frame(&self, generation: u64, text: &str) {
        match InboundMessage::parse(text, Utc::now()) {
            Ok(InboundMessage::WebhookData(event)) => {
                let control = lock(&self.control);
                if control.generation != generation || !self.state().is_connected() {
                    return;
                }
                let evicted = lock(&self.buffer).push(event.clone());
                debug!(
                    event_id = %event.id(),
                    evicted = evicted.is_some(),
                    "Webhook event received"
                );
                let _ = self.events_tx.send(ClientEvent::Received(event));
            }
            Ok(InboundMessage::ConnectionStatus {
                status,
                subscriber_id,
            }) => {
                debug!(status = %status, subscriber_id = ?subscriber_id, "Relay status");
                let mut control = lock(&self.control);
                if control.generation == generation {
                    control.subscriber_id = subscriber_id;
                }
            }
            Ok(InboundMessage::Unknown(name)) => {
                debug!(event = %name, "Ignoring unknown relay event");
            }
            Err(e) => {
                warn!(error = %e, len = text.len(), "Dropping malformed relay frame");
            }
        }
    }

    /// Reads frames until the peer closes, the read fails, or `cancel`.
    async fn pump(&self, generation: u64, transport: &mut dyn Transport, cancel: &CancellationToken) {
        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => return,
                frame = transport.recv() => frame,
            };
            match frame {
                Some(Ok(text)) => self.handle_frame(generation, &text),
                Some(Err(e)) => {
                    warn!(error = %e, "Relay connection failed");
                    self.dropped(generation);
                    return;
                }
                None => {
                    self.dropped(generation);
                    return;
                }
            }
        }
    }
}

/// One session: bounded connect attempts, then the read loop.
///
/// The transport is closed on every exit path once it exists.
async fn run_session(inner: Arc<Inner>, generation: u64, url: Url, cancel: CancellationToken) {
    let attempts = inner.config.reconnection_attempts.saturating_add(1);
    let timeout = inner.config.connect_timeout();
    let mut last_error = TransportError::Connect("no attempt made".to_string());

    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = inner.config.backoff_for(attempt - 1);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Retrying relay connection");
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            outcome = tokio::time::timeout(timeout, inner.connector.connect(&url)) => outcome,
        };

        match outcome {
            Ok(Ok(mut transport)) => {
                if inner.opened(generation) {
                    info!(channel = %url, attempt, "Connected to relay");
                    inner.pump(generation, transport.as_mut(), &cancel).await;
                } else {
                    debug!(generation, "Connection resolved after it was abandoned");
                }
                transport.close().await;
                return;
            }
            Ok(Err(e)) => last_error = e,
            Err(_) => last_error = TransportError::Timeout(timeout),
        }

        warn!(attempt, attempts, error = %last_error, "Relay connection attempt failed");
    }

    inner.failed(generation, last_error);
}
