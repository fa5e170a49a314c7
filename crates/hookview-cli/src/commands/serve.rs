//! Start the relay server.

use clap::Args;

use hookview_core::config::AppConfig;
use hookview_core::error::AppError;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting hookview relay...");
    output::print_kv("Address", &config.server.bind_address());
    output::print_kv("Webhook path", &config.webhook.callback_path);
    output::print_kv("Channel path", &config.realtime.ws_path);
    if config.webhook.shared_secret.is_empty() {
        output::print_warning("No shared secret configured; every delivery will be rejected");
    }

    hookview_api::run_server(config).await
}
