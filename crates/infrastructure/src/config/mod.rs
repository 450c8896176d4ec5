//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `security`: Shared API key
//! - `database`: SQLite database settings
//! - `geocoding`: Nominatim provider settings
//! - `resilience`: Retry policy for upstream calls
//! - `workflow`: Booking and closest-load query settings
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml` in the working directory, then `LOADBROKER_*` environment
//! variables with `__` between nested keys (`LOADBROKER_SERVER__PORT=9000`,
//! `LOADBROKER_SECURITY__API_KEY=...`).

mod database;
mod geocoding;
mod resilience;
mod security;
mod server;
mod workflow;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use database::DatabaseConfig;
pub use geocoding::GeocodingAppConfig;
pub use resilience::RetryAppConfig;
pub use security::SecurityConfig;
pub use server::ServerConfig;
pub use workflow::{BookingAppConfig, ClosestAppConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LOADBROKER";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Production hides internal error details from API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - detailed errors
    #[default]
    Development,
    /// Production environment - opaque internal errors
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingAppConfig,

    /// Retry configuration for geocoding calls
    #[serde(default)]
    pub retry: RetryAppConfig,

    /// Booking workflow configuration
    #[serde(default)]
    pub booking: BookingAppConfig,

    /// Closest-load query configuration
    #[serde(default)]
    pub closest: ClosestAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional) and environment
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Whether internal error details must be hidden from clients
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    /// Check semantic constraints the deserializer cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.database.path == ":memory:" && self.database.max_connections != 1 {
            return Err("database.max_connections must be 1 for an in-memory database".into());
        }
        if self.database.max_connections == 0 {
            return Err("database.max_connections must be at least 1".into());
        }
        if self.closest.max_ranked == 0 {
            return Err("closest.max_ranked must be at least 1".into());
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err("retry.multiplier must be a finite number >= 1.0".into());
        }
        Ok(())
    }
}
