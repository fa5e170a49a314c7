//! Sign a body and deliver it to a relay.

use clap::Args;
use tracing::{debug, warn};

use hookview_client::BackendTarget;
use hookview_core::config::AppConfig;
use hookview_core::error::AppError;
use hookview_core::samples::TestEventKind;

use crate::output;

/// Arguments for the send command
#[derive(Debug, Args)]
pub struct SendArgs {
    /// Relay base URL, e.g. http://localhost:3001
    pub backend_url: String,

    /// Send a bundled sample
    #[arg(long, conflicts_with = "file")]
    pub sample: Option<TestEventKind>,

    /// Send the contents of this file (stdin when neither option is given)
    #[arg(long)]
    pub file: Option<String>,

    /// Shared secret (defaults to the configured one)
    #[arg(short, long, env = "SHOPIFY_SHARED_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Send without a signature header
    #[arg(long)]
    pub unsigned: bool,
}

/// Execute the send command
pub async fn execute(args: &SendArgs, config: AppConfig) -> Result<(), AppError> {
    let target = BackendTarget::with_paths(
        &args.backend_url,
        &config.webhook.callback_path,
        &config.realtime.ws_path,
    )?;

    let body = match args.sample {
        Some(kind) => serde_json::to_vec(&kind.payload())?,
        None => super::read_body(args.file.as_deref()).await?,
    };

    let mut request = reqwest::Client::new()
        .post(target.webhook_endpoint().as_str())
        .header(reqwest::header::CONTENT_TYPE, "application/json");

    if let Some(kind) = args.sample {
        request = request.header("X-Shopify-Topic", kind.topic());
    }
    if !args.unsigned {
        let secret = super::resolve_secret(args.secret.as_deref(), &config);
        let signature = hookview_auth::sign(&body, secret.as_bytes())?;
        request = request.header(config.webhook.signature_header.as_str(), signature);
    }

    debug!(
        endpoint = %target.webhook_endpoint(),
        body_len = body.len(),
        signed = !args.unsigned,
        "Sending delivery"
    );

    let response = request
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::transport(format!("Delivery to {} failed: {}", target.webhook_endpoint(), e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::transport(format!("Failed to read response: {}", e)))?;

    if status.is_success() {
        output::print_success(&format!("{} {}", status, text));
        Ok(())
    } else {
        warn!(status = status.as_u16(), "Relay refused the delivery");
        output::print_error(&format!("{} {}", status, text));
        Err(AppError::transport(format!("Relay answered {}", status)))
    }
}
