//! Compute a webhook signature.

use clap::Args;

use hookview_core::config::AppConfig;
use hookview_core::error::AppError;

/// Arguments for the sign command
#[derive(Debug, Args)]
pub struct SignArgs {
    /// Shared secret (defaults to the configured one)
    #[arg(short, long, env = "SHOPIFY_SHARED_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Read the body from this file instead of stdin
    #[arg(long)]
    pub file: Option<String>,
}

/// Execute the sign command
pub async fn execute(args: &SignArgs, config: AppConfig) -> Result<(), AppError> {
    let body = super::read_body(args.file.as_deref()).await?;
    let secret = super::resolve_secret(args.secret.as_deref(), &config);
    println!("{}", hookview_auth::sign(&body, secret.as_bytes())?);
    Ok(())
}
