//! WebSocket upgrade handler for viewers.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// GET {ws_path}
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established viewer connection until either side goes away.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Register subscriber; its greeting is already queued.
    let (handle, mut outbound_rx) = state.realtime.registry.open();
    let sub_id = handle.id;
    let closed = handle.closed();
    drop(handle);

    let mut shutdown = state.realtime.shutdown_receiver();
    let mut heartbeat = state.realtime.heartbeat();
    let mut ping = tokio::time::interval(heartbeat.ping_interval);
    ping.tick().await;

    info!(subscriber_id = %sub_id, "WebSocket connection established");

    loop {
        tokio::select! {
            _ = closed.cancelled() => {
                debug!(subscriber_id = %sub_id, "Subscriber closed by registry");
                break;
            }
            _ = shutdown.recv() => break,
            frame = outbound_rx.recv() => match frame {
                Some(frame) => {
                    if ws_tx.send(Message::Text(frame.to_string().into())).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            _ = ping.tick() => {
                if heartbeat.is_expired() {
                    warn!(
                        subscriber_id = %sub_id,
                        silent_ms = heartbeat.silence().as_millis() as u64,
                        "Subscriber heartbeat timed out"
                    );
                    break;
                }
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => heartbeat.record_activity(),
                Some(Err(e)) => {
                    debug!(subscriber_id = %sub_id, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    // Cleanup
    let _ = ws_tx.send(Message::Close(None)).await;
    state.realtime.registry.unregister(&sub_id);

    info!(subscriber_id = %sub_id, "WebSocket connection closed");
}
