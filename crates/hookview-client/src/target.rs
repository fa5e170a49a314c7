//! Backend target validation.

use std::fmt;

use url::Url;

use hookview_core::config::webhook::DEFAULT_CALLBACK_PATH;
use hookview_core::error::AppError;

/// Default channel path, matching the relay's default.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// A validated relay address.
///
/// Built from one base URL; the delivery endpoint and the channel address
/// are derived from it. Query and fragment are dropped, a base path is
/// kept as prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    base: Url,
    webhook_endpoint: Url,
    channel_url: Url,
}

impl BackendTarget {
    /// Validates `raw` with the default paths.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        Self::with_paths(raw, DEFAULT_CALLBACK_PATH, DEFAULT_WS_PATH)
    }

    /// Validates `raw` and derives both addresses.
    ///
    /// Only `http`, `https`, `ws` and `wss` URLs with a host are accepted.
    pub fn with_paths(raw: &str, callback_path: &str, ws_path: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Backend URL is empty"));
        }

        let mut base = Url::parse(trimmed)
            .map_err(|e| AppError::validation(format!("Invalid backend URL '{trimmed}': {e}")))?;

        let (http_scheme, ws_scheme) = match base.scheme() {
            "http" | "ws" => ("http", "ws"),
            "https" | "wss" => ("https", "wss"),
            other => {
                return Err(AppError::validation(format!(
                    "Invalid backend URL scheme '{other}' (expected http, https, ws or wss)"
                )));
            }
        };

        if base.host_str().is_none_or(str::is_empty) {
            return Err(AppError::validation(format!("Backend URL '{trimmed}' has no host")));
        }

        base.set_query(None);
        base.set_fragment(None);
        set_scheme(&mut base, http_scheme)?;

        let prefix = base.path().trim_end_matches('/').to_string();

        let mut webhook_endpoint = base.clone();
        webhook_endpoint.set_path(&format!("{prefix}{callback_path}"));

        let mut channel_url = base.clone();
        set_scheme(&mut channel_url, ws_scheme)?;
        channel_url.set_path(&format!("{prefix}{ws_path}"));

        Ok(Self {
            base,
            webhook_endpoint,
            channel_url,
        })
    }

    /// Base URL, always http or https.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Where the upstream platform should deliver webhooks.
    pub fn webhook_endpoint(&self) -> &Url {
        &self.webhook_endpoint
    }

    /// WebSocket address of the subscriber channel.
    pub fn channel_url(&self) -> &Url {
        &self.channel_url
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

fn set_scheme(url: &mut Url, scheme: &str) -> Result<(), AppError> {
    url.set_scheme(scheme)
        .map_err(|()| AppError::validation(format!("Cannot use scheme '{scheme}' for {url}")))
}
