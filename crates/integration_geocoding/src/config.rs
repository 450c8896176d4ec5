//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Maximum number of cached place names
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Comma-separated ISO country codes to restrict results (empty = worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// User-Agent sent with every request (required by the usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between upstream requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_cache_capacity() -> u64 {
    1000
}

fn default_user_agent() -> String {
    format!("loadbroker/{} (freight load broker)", env!("CARGO_PKG_VERSION"))
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            cache_capacity: default_cache_capacity(),
            country_filter: String::new(),
            user_agent: default_user_agent(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing against a mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 2,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Whether results should be cached
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.cache_ttl_hours > 0 && self.cache_capacity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_ttl_hours, 24);
        assert_eq!(config.min_request_interval_ms, 1100);
        assert!(config.country_filter.is_empty());
        assert!(config.user_agent.starts_with("loadbroker/"));
        assert!(config.cache_enabled());
    }

    #[test]
    fn test_for_testing_disables_rate_limit() {
        let config = NominatimConfig::for_testing("http://127.0.0.1:9");
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.min_request_interval_ms, 0);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let config = NominatimConfig {
            cache_ttl_hours: 0,
            ..Default::default()
        };
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: NominatimConfig =
            serde_json::from_str(r#"{"country_filter": "us,ca"}"#).unwrap();
        assert_eq!(config.country_filter, "us,ca");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.cache_capacity, 1000);
    }
}
