//! End-to-end tests: a live relay, a real viewer connection, signed deliveries over HTTP.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use hookview_client::{ClientConnectionManager, ClientEvent, ConnectionState};
use hookview_core::config::ClientConfig;
use hookview_realtime::RealtimeEngine;

const WAIT: Duration = Duration::from_secs(5);

async fn spawn_relay() -> (String, Arc<RealtimeEngine>) {
    helpers::spawn_server(helpers::test_config(helpers::TEST_SECRET)).await
}

async fn wait_for_viewers(realtime: &RealtimeEngine, count: usize) {
    helpers::wait_for_viewers(realtime, count, WAIT).await;
}

async fn post_signed(base: &str, body: &'static [u8]) -> reqwest::StatusCode {
    reqwest::Client::new()
        .post(format!("{}/api/webhook", base))
        .header("X-Shopify-Hmac-SHA256", helpers::sign(body))
        .body(body)
        .send()
        .await
        .expect("Delivery failed")
        .status()
}

#[tokio::test]
async fn test_viewer_receives_signed_delivery() {
    let (base, realtime) = spawn_relay().await;
    let manager = ClientConnectionManager::websocket(ClientConfig::default());
    let mut states = manager.subscribe_state();
    let mut events = manager.subscribe_events();

    manager.connect(&base).expect("Valid URL");
    timeout(WAIT, states.wait_for(|state| state.is_connected()))
        .await
        .expect("Never connected")
        .expect("State channel closed");
    wait_for_viewers(&realtime, 1).await;

    let status = post_signed(&base, br#"{"order":1}"#).await;
    assert_eq!(status, reqwest::StatusCode::OK);

    let event = timeout(WAIT, async {
        loop {
            if let Ok(ClientEvent::Received(event)) = events.recv().await {
                return event;
            }
        }
    })
    .await
    .expect("Event never arrived");

    assert_eq!(event.payload(), &serde_json::json!({"order": 1}));
    assert_eq!(manager.events().len(), 1);
    assert_eq!(manager.events()[0].id(), event.id());

    manager.disconnect().await;
    assert_eq!(manager.state(), ConnectionState::Disconnected);
    wait_for_viewers(&realtime, 0).await;
}

#[tokio::test]
async fn test_rejected_delivery_never_reaches_viewer() {
    let (base, realtime) = spawn_relay().await;
    let manager = ClientConnectionManager::websocket(ClientConfig::default());
    let mut states = manager.subscribe_state();

    manager.connect(&base).expect("Valid URL");
    timeout(WAIT, states.wait_for(|state| state.is_connected()))
        .await
        .expect("Never connected")
        .expect("State channel closed");
    wait_for_viewers(&realtime, 1).await;

    let status = reqwest::Client::new()
        .post(format!("{}/api/webhook", base))
        .header("X-Shopify-Hmac-SHA256", "")
        .body(r#"{"order":1}"#)
        .send()
        .await
        .expect("Delivery failed")
        .status();
    assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);

    // A later accepted delivery proves the channel was live the whole time.
    assert_eq!(post_signed(&base, br#"{"order":2}"#).await, reqwest::StatusCode::OK);
    timeout(WAIT, async {
        while manager.events().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("Event never arrived");

    let events = manager.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload(), &serde_json::json!({"order": 2}));
}

#[tokio::test]
async fn test_relay_shutdown_disconnects_viewer() {
    let (base, realtime) = spawn_relay().await;
    let manager = ClientConnectionManager::websocket(ClientConfig::default());
    let mut states = manager.subscribe_state();

    manager.connect(&base).expect("Valid URL");
    timeout(WAIT, states.wait_for(|state| state.is_connected()))
        .await
        .expect("Never connected")
        .expect("State channel closed");
    wait_for_viewers(&realtime, 1).await;

    realtime.shutdown();

    timeout(WAIT, states.wait_for(|state| *state == ConnectionState::Disconnected))
        .await
        .expect("Viewer never noticed the shutdown")
        .expect("State channel closed");
}

#[tokio::test]
async fn test_unreachable_relay_ends_in_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);

    let config = ClientConfig {
        reconnection_attempts: 1,
        initial_backoff_ms: 10,
        ..ClientConfig::default()
    };
    let manager = ClientConnectionManager::websocket(config);
    let mut states = manager.subscribe_state();

    manager.connect(&format!("http://{}", addr)).expect("Valid URL");

    timeout(WAIT, states.wait_for(|state| *state == ConnectionState::Error))
        .await
        .expect("Never gave up")
        .expect("State channel closed");
    assert!(manager.last_error().is_some());
}
