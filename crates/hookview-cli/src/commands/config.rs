//! Configuration inspection commands.

use clap::{Args, Subcommand};

use hookview_core::config::AppConfig;
use hookview_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (the secret is never printed)
    Show,
    /// Validate the effective configuration
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    loaded: Result<AppConfig, AppError>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = loaded?;
            match format {
                // The secret is skipped when serializing.
                OutputFormat::Json => output::print_json(&config, true),
                OutputFormat::Table => show_summary(&config),
            }
        }
        ConfigCommand::Validate => match loaded {
            Ok(config) => {
                output::print_success("Configuration is valid");
                show_summary(&config);
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}

fn show_summary(config: &AppConfig) {
    output::print_kv("Listen", &config.server.bind_address());
    output::print_kv("Max body", &format!("{} bytes", config.server.max_body_bytes));
    output::print_kv("Webhook path", &config.webhook.callback_path);
    output::print_kv("Signature header", &config.webhook.signature_header);
    output::print_kv("Shared secret", mask_secret(&config.webhook.shared_secret));
    output::print_kv("Channel path", &config.realtime.ws_path);
    output::print_kv(
        "Heartbeat",
        &format!(
            "ping every {}s, drop after {}s",
            config.realtime.ping_interval_seconds, config.realtime.ping_timeout_seconds
        ),
    );
    output::print_kv(
        "Client retries",
        &format!(
            "{} (backoff {}ms..{}ms)",
            config.client.reconnection_attempts,
            config.client.initial_backoff_ms,
            config.client.max_backoff_ms
        ),
    );
    output::print_kv("Client buffer", &config.client.buffer_capacity.to_string());
    output::print_kv(
        "Logging",
        &format!("{} ({})", config.logging.level, config.logging.format),
    );
}

/// Mask the shared secret for display
fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() { "(not set)" } else { "****" }
}
