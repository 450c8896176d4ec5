//! Geocoding port
//!
//! Resolves free-text place names ("Dallas, TX") to coordinates.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for forward geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a place name to its best-matching location
    ///
    /// `Ok(None)` means the provider knows no such place. Provider outages
    /// and unparseable responses are `Err(ExternalService)`.
    async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, ApplicationError>;
}
