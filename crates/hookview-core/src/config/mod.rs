//! Application configuration schemas.
//!
//! Configuration is merged from optional TOML files, `HOOKVIEW__*`
//! environment variables, and the upstream platform's conventional
//! variables (`SHOPIFY_SHARED_SECRET`, `PORT`). It is loaded once at
//! startup and treated as read-only afterwards.

pub mod app;
pub mod client;
pub mod logging;
pub mod realtime;
pub mod webhook;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::client::{ClientConfig, MAX_RECONNECTION_ATTEMPTS};
pub use self::logging::LoggingConfig;
pub use self::realtime::RealtimeConfig;
pub use self::webhook::WebhookConfig;

use crate::error::AppError;
use crate::result::AppResult;

/// Environment variable holding the webhook shared secret.
pub const SECRET_ENV_VAR: &str = "SHOPIFY_SHARED_SECRET";

/// Environment variable holding the listening port.
pub const PORT_ENV_VAR: &str = "PORT";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Webhook endpoint and signature settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Viewer connection settings.
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Sources, later ones winning: `config/default.toml`,
    /// `config/{env}.toml`, an explicit file if given, `HOOKVIEW__*`
    /// variables, then `SHOPIFY_SHARED_SECRET` and `PORT`.
    pub fn load(env: &str, config_file: Option<&str>) -> AppResult<Self> {
        let mut builder = config::Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env}")).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let builder = builder
            .add_source(
                Environment::with_prefix("HOOKVIEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("webhook.shared_secret", std::env::var(SECRET_ENV_VAR).ok())?
            .set_override_option("server.port", std::env::var(PORT_ENV_VAR).ok())?;

        Self::from_builder(builder)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> AppResult<Self> {
        Self::from_builder(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> AppResult<Self> {
        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> AppResult<()> {
        if !self.webhook.callback_path.starts_with('/') {
            return Err(AppError::configuration(
                "webhook.callback_path must start with '/'",
            ));
        }
        if !self.realtime.ws_path.starts_with('/') {
            return Err(AppError::configuration(
                "realtime.ws_path must start with '/'",
            ));
        }
        if self.webhook.callback_path == self.realtime.ws_path {
            return Err(AppError::configuration(
                "webhook.callback_path and realtime.ws_path must differ",
            ));
        }
        if self.webhook.signature_header.trim().is_empty() {
            return Err(AppError::configuration(
                "webhook.signature_header must not be empty",
            ));
        }
        if self.realtime.channel_buffer_size == 0 {
            return Err(AppError::configuration(
                "realtime.channel_buffer_size must be at least 1",
            ));
        }
        if self.client.buffer_capacity == 0 {
            return Err(AppError::configuration(
                "client.buffer_capacity must be at least 1",
            ));
        }
        if self.client.connect_timeout_ms == 0 {
            return Err(AppError::configuration(
                "client.connect_timeout_ms must be at least 1",
            ));
        }
        if self.client.reconnection_attempts > MAX_RECONNECTION_ATTEMPTS {
            return Err(AppError::configuration(format!(
                "client.reconnection_attempts must be at most {MAX_RECONNECTION_ATTEMPTS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.webhook.callback_path, "/api/webhook");
        assert_eq!(config.webhook.signature_header, "X-Shopify-Hmac-SHA256");
        assert!(config.webhook.shared_secret.is_empty());
        assert_eq!(config.realtime.ws_path, "/ws");
        assert_eq!(config.client.buffer_capacity, 50);
        assert_eq!(config.client.reconnection_attempts, 3);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 4000

            [webhook]
            shared_secret = "topsecret"
            callback_path = "/hooks/shop"

            [client]
            connect_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.webhook.shared_secret, "topsecret");
        assert_eq!(config.webhook.callback_path, "/hooks/shop");
        assert_eq!(config.client.connect_timeout_ms, 250);
    }

    #[test]
    fn test_secret_is_neither_serialized_nor_debug_printed() {
        let mut config = AppConfig::default();
        config.webhook.shared_secret = "topsecret".to_string();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("topsecret"));

        let debug = format!("{config:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_rejects_relative_callback_path() {
        let err = AppConfig::from_toml_str("[webhook]\ncallback_path = \"api/webhook\"")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_colliding_paths() {
        let err = AppConfig::from_toml_str("[realtime]\nws_path = \"/api/webhook\"").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_zero_connect_timeout() {
        let err = AppConfig::from_toml_str("[client]\nconnect_timeout_ms = 0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("connect_timeout_ms"));
    }

    #[test]
    fn test_caps_reconnection_attempts() {
        let config = AppConfig::from_toml_str("[client]\nreconnection_attempts = 10").unwrap();
        assert_eq!(config.client.reconnection_attempts, MAX_RECONNECTION_ATTEMPTS);

        let err = AppConfig::from_toml_str("[client]\nreconnection_attempts = 11").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("reconnection_attempts"));
    }
}
