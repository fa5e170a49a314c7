//! Integration tests for health and metrics endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();
    let (_viewer, _rx) = app.realtime.registry.open();

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], json!("ok"));
    assert_eq!(response.body["data"]["subscribers"], json!(1));
}

#[tokio::test]
async fn test_metrics_count_deliveries() {
    let app = helpers::TestApp::new();
    let body = br#"{"order":1}"#;

    app.deliver(body, Some(&helpers::sign(body))).await;
    app.deliver(body, Some("bogus")).await;
    app.deliver(b"nope", Some(&helpers::sign(b"nope"))).await;

    let response = app.request("GET", "/api/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["deliveries_accepted"], json!(1));
    assert_eq!(data["deliveries_rejected"], json!(1));
    assert_eq!(data["deliveries_malformed"], json!(1));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/nothing-here").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_webhook_path_is_not_allowed() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/webhook").await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}
