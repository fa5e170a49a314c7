//! CLI command definitions and dispatch.

pub mod config;
pub mod samples;
pub mod send;
pub mod serve;
pub mod sign;
pub mod watch;

use clap::{Parser, Subcommand};

use hookview_core::config::AppConfig;
use hookview_core::error::AppError;

use crate::output::OutputFormat;

/// hookview: preview signed webhook deliveries in real time
#[derive(Debug, Parser)]
#[command(name = "hookview", version, about, long_about = None)]
pub struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Configuration environment (loads config/{env}.toml when present)
    #[arg(long, global = true, env = "HOOKVIEW_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the relay server
    Serve(serve::ServeArgs),
    /// Connect to a relay and print events as they arrive
    Watch(watch::WatchArgs),
    /// Print the signature of a body
    Sign(sign::SignArgs),
    /// Sign a body and deliver it to a relay
    Send(send::SendArgs),
    /// List bundled test events
    Samples(samples::SamplesArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, self.load_config()?).await,
            Commands::Watch(args) => watch::execute(args, self.load_config()?, self.format).await,
            Commands::Sign(args) => sign::execute(args, self.load_config()?).await,
            Commands::Send(args) => send::execute(args, self.load_config()?).await,
            Commands::Samples(args) => samples::execute(args, self.format),
            Commands::Config(args) => config::execute(args, self.load_config(), self.format),
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) => "info",
            _ => "warn",
        }
    }

    /// Helper: load configuration for the selected environment
    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(&self.env, self.config.as_deref())
    }
}

/// Helper: read a body from a file, or stdin when no path is given
pub async fn read_body(path: Option<&str>) -> Result<Vec<u8>, AppError> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .map_err(|e| AppError::validation(format!("Failed to read '{}': {}", path, e))),
        None => {
            use tokio::io::AsyncReadExt;
            let mut body = Vec::new();
            tokio::io::stdin().read_to_end(&mut body).await?;
            Ok(body)
        }
    }
}

/// Helper: the secret given on the command line, else the configured one
pub fn resolve_secret(flag: Option<&str>, config: &AppConfig) -> String {
    flag.map(str::to_string)
        .unwrap_or_else(|| config.webhook.shared_secret.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookview_core::samples::TestEventKind;

    #[test]
    fn test_send_parses_sample_kind() {
        let cli = Cli::try_parse_from([
            "hookview",
            "send",
            "http://localhost:3001",
            "--sample",
            "order-created",
        ])
        .unwrap();

        match cli.command {
            Commands::Send(args) => {
                assert_eq!(args.sample, Some(TestEventKind::OrderCreated));
                assert!(!args.unsigned);
            }
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn test_send_rejects_sample_and_file_together() {
        let result = Cli::try_parse_from([
            "hookview",
            "send",
            "http://localhost:3001",
            "--sample",
            "order-created",
            "--file",
            "body.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_watch_json_format_and_log_filter() {
        let cli =
            Cli::try_parse_from(["hookview", "--format", "json", "watch", "ws://relay:3001"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.default_log_filter(), "warn");

        let serve = Cli::try_parse_from(["hookview", "serve", "--port", "4000"]).unwrap();
        assert_eq!(serve.default_log_filter(), "info");
    }

    #[test]
    fn test_resolve_secret_prefers_flag() {
        let mut config = AppConfig::default();
        config.webhook.shared_secret = "from-config".to_string();

        assert_eq!(resolve_secret(Some("from-flag"), &config), "from-flag");
        assert_eq!(resolve_secret(None, &config), "from-config");
    }
}
