//! Integration tests for the webhook delivery endpoint.

mod helpers;

use http::StatusCode;
use serde_json::{Value, json};

const ORDER: &[u8] = br#"{"order":1}"#;

#[tokio::test]
async fn test_signed_delivery_is_acknowledged_and_broadcast_once() {
    let app = helpers::TestApp::new();
    let (_viewer, mut rx) = app.realtime.registry.open();
    rx.try_recv().expect("status greeting");

    let response = app.deliver(ORDER, Some(&helpers::sign(ORDER))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"received": true}));

    let frame: Value = serde_json::from_str(&rx.try_recv().expect("broadcast frame")).unwrap();
    assert_eq!(frame["event"], json!("newWebhookData"));
    assert_eq!(frame["data"]["data"], json!({"order": 1}));
    assert!(frame["data"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(frame["data"]["timestamp"].is_string());
    assert!(rx.try_recv().is_err(), "delivery broadcast more than once");
}

#[tokio::test]
async fn test_empty_signature_is_rejected_without_broadcast() {
    let app = helpers::TestApp::new();
    let (_viewer, mut rx) = app.realtime.registry.open();
    rx.try_recv().expect("status greeting");

    let response = app.deliver(ORDER, Some("")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, "Invalid webhook signature");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_missing_signature_is_rejected() {
    let app = helpers::TestApp::new();

    let response = app.deliver(ORDER, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, "Invalid webhook signature");
}

#[tokio::test]
async fn test_signature_for_other_body_is_rejected() {
    let app = helpers::TestApp::new();
    let signature = helpers::sign(br#"{"order":2}"#);

    let response = app.deliver(ORDER, Some(&signature)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reserialized_body_fails_verification() {
    let app = helpers::TestApp::new();
    let spaced = br#"{ "order": 1 }"#;

    let response = app.deliver(spaced, Some(&helpers::sign(ORDER))).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unset_secret_rejects_everything() {
    let app = helpers::TestApp::with_secret("");

    let response = app.deliver(ORDER, Some(&helpers::sign(ORDER))).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_non_json_body_is_server_error() {
    let app = helpers::TestApp::new();
    let (_viewer, mut rx) = app.realtime.registry.open();
    rx.try_recv().expect("status greeting");
    let body = b"order=1";

    let response = app.deliver(body, Some(&helpers::sign(body))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_delivery_without_viewers_is_acknowledged() {
    let app = helpers::TestApp::new();

    let response = app.deliver(ORDER, Some(&helpers::sign(ORDER))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["received"], json!(true));
}

#[tokio::test]
async fn test_every_viewer_receives_the_delivery() {
    let app = helpers::TestApp::new();
    let mut receivers: Vec<_> = (0..3).map(|_| app.realtime.registry.open().1).collect();
    for rx in &mut receivers {
        rx.try_recv().expect("status greeting");
    }

    let response = app.deliver(ORDER, Some(&helpers::sign(ORDER))).await;
    assert_eq!(response.status, StatusCode::OK);

    let ids: Vec<Value> = receivers
        .iter_mut()
        .map(|rx| {
            let frame: Value = serde_json::from_str(&rx.try_recv().expect("frame")).unwrap();
            frame["data"]["id"].clone()
        })
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}
