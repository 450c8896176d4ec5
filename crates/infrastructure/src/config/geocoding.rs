//! Geocoding provider configuration.

use integration_geocoding::NominatimConfig;
use serde::{Deserialize, Serialize};

/// Nominatim settings as exposed in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingAppConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 disables the cache)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Maximum cached place names
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// ISO country codes to restrict results to, comma separated
    #[serde(default)]
    pub country_filter: String,

    /// Custom User-Agent (defaults to the client's own)
    #[serde(default)]
    pub user_agent: Option<String>,

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

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for GeocodingAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            cache_capacity: default_cache_capacity(),
            country_filter: String::new(),
            user_agent: None,
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl GeocodingAppConfig {
    /// Convert to the client configuration
    #[must_use]
    pub fn to_nominatim_config(&self) -> NominatimConfig {
        let defaults = NominatimConfig::default();
        NominatimConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            cache_ttl_hours: self.cache_ttl_hours,
            cache_capacity: self.cache_capacity,
            country_filter: self.country_filter.clone(),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            min_request_interval_ms: self.min_request_interval_ms,
        }
    }
}
