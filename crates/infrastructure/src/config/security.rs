//! Security configuration: the shared API key.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Security configuration
///
/// The webhook caller (the voice agent) and dashboard clients share one key,
/// sent as `X-API-KEY` or as an `api_key`/`key` query parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Shared API key; `None` disables authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl SecurityConfig {
    /// The configured key, ignoring blank values
    #[must_use]
    pub fn effective_api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
    }
}
