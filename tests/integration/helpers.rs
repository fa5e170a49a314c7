//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use hookview_api::{AppState, build_app};
use hookview_core::config::AppConfig;
use hookview_realtime::RealtimeEngine;

/// Shared secret used by every test app.
pub const TEST_SECRET: &str = "hush-test-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Subscriber channel, for opening viewers directly
    pub realtime: Arc<RealtimeEngine>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a test application keyed with [`TEST_SECRET`]
    pub fn new() -> Self {
        Self::with_secret(TEST_SECRET)
    }

    /// Create a test application keyed with `secret`
    pub fn with_secret(secret: &str) -> Self {
        let config = test_config(secret);
        let state = AppState::new(config.clone());
        let realtime = state.realtime.clone();

        Self {
            router: build_app(state),
            realtime,
            config,
        }
    }

    /// Signature header name
    pub fn signature_header(&self) -> &str {
        &self.config.webhook.signature_header
    }

    /// POST a raw body to the webhook endpoint
    pub async fn deliver(&self, body: &[u8], signature: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri(self.config.webhook.callback_path.as_str())
            .header("Content-Type", "application/json");

        if let Some(signature) = signature {
            req = req.header(self.signature_header(), signature);
        }

        let req = req
            .body(Body::from(body.to_vec()))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// Configuration for tests: defaults plus a known secret
pub fn test_config(secret: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.webhook.shared_secret = secret.to_string();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config
}

/// Serve `config` on an ephemeral local port; returns the base URL and the subscriber channel.
pub async fn spawn_server(config: AppConfig) -> (String, Arc<RealtimeEngine>) {
    let state = AppState::new(config);
    let realtime = state.realtime.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    (format!("http://{}", addr), realtime)
}

/// Wait until the relay has exactly `count` registered viewers.
pub async fn wait_for_viewers(realtime: &RealtimeEngine, count: usize, within: Duration) {
    tokio::time::timeout(within, async {
        while realtime.registry.len() != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "expected {} viewers, still {}",
            count,
            realtime.registry.len()
        )
    });
}

/// Sign a body with [`TEST_SECRET`]
pub fn sign(body: &[u8]) -> String {
    hookview_auth::sign(body, TEST_SECRET.as_bytes()).expect("Failed to sign body")
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` if not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}
