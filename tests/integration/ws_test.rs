//! Integration tests for the subscriber channel endpoint.

mod helpers;

use std::time::Duration;

#[tokio::test]
async fn test_ws_path_requires_upgrade() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/ws").await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx for a plain GET, got {}",
        response.status
    );
    assert!(app.realtime.registry.is_empty());
}

#[tokio::test]
async fn test_silent_viewer_is_dropped_after_ping_timeout() {
    let mut config = helpers::test_config(helpers::TEST_SECRET);
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 1;
    let (base, realtime) = helpers::spawn_server(config).await;

    let url = format!("{}/ws", base.replacen("http://", "ws://", 1));
    // Never read from the stream, so pings go unanswered.
    let (_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .expect("WebSocket handshake failed");

    helpers::wait_for_viewers(&realtime, 1, Duration::from_secs(5)).await;
    helpers::wait_for_viewers(&realtime, 0, Duration::from_secs(10)).await;

    let metrics = realtime.metrics.snapshot();
    assert_eq!(metrics.subscribers_active, 0);
    assert_eq!(metrics.subscribers_total, 1);
}

#[tokio::test]
async fn test_responsive_viewer_survives_heartbeat() {
    use futures::StreamExt;

    let mut config = helpers::test_config(helpers::TEST_SECRET);
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 2;
    let (base, realtime) = helpers::spawn_server(config).await;

    let url = format!("{}/ws", base.replacen("http://", "ws://", 1));
    let (mut stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .expect("WebSocket handshake failed");
    helpers::wait_for_viewers(&realtime, 1, Duration::from_secs(5)).await;

    // Reading lets the client answer pings automatically.
    let _ = tokio::time::timeout(Duration::from_secs(4), async {
        while stream.next().await.is_some() {}
    })
    .await;

    assert_eq!(realtime.registry.len(), 1);
}
