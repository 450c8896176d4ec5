//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite persistence
//! for loads and bookings, the Nominatim geocoding adapter, configuration
//! loading, retry policy and log initialisation.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod retry;
pub mod telemetry;

pub use adapters::GeocodingAdapter;
pub use config::{
    AppConfig, BookingAppConfig, ClosestAppConfig, DatabaseConfig, Environment,
    GeocodingAppConfig, RetryAppConfig, SecurityConfig, ServerConfig,
};
pub use persistence::{ConnectionPool, DatabaseError, SqliteLoadStore, create_pool, seed_sample_data};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{LogFormat, TelemetryError, init_tracing};
