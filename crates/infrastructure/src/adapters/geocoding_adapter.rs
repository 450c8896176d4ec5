//! Geocoding adapter - Implements GeocodingPort using integration_geocoding

use application::{ApplicationError, GeocodingPort};
use async_trait::async_trait;
use domain::GeoLocation;
use integration_geocoding::{GeocodingClient, GeocodingError, NominatimGeocodingClient};
use tracing::{debug, instrument};

use crate::config::GeocodingAppConfig;
use crate::retry::{RetryConfig, with_retry};

/// Nominatim-backed geocoder with retry on transient upstream failures
pub struct GeocodingAdapter {
    client: NominatimGeocodingClient,
    retry: RetryConfig,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .field("retry", &self.retry)
            .finish()
    }
}

impl GeocodingAdapter {
    /// Build the HTTP client from application config
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(config: &GeocodingAppConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(&config.to_nominatim_config())
            .map_err(Self::map_error)?;
        Ok(Self::from_client(client, retry))
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn from_client(client: NominatimGeocodingClient, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::ConfigurationError(e) => ApplicationError::Configuration(e),
            other => ApplicationError::ExternalService(format!("Geocoding failed: {other}")),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, ApplicationError> {
        let outcome = with_retry(&self.retry, || self.client.geocode(place)).await;
        if outcome.attempts > 1 {
            debug!(attempts = outcome.attempts, "Geocoding needed retries");
        }
        outcome.into_result().map_err(Self::map_error)
    }
}
