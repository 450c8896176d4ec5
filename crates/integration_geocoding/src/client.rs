//! Nominatim geocoding client
//!
//! Implements rate limiting (one request per `min_request_interval_ms`, per
//! Nominatim usage policy) and result caching to minimize API calls. Both
//! hits and confirmed misses are cached; transport and upstream failures are
//! never cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::GeoLocation;
use moka::future::Cache;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::{config::NominatimConfig, error::GeocodingError, models::NominatimResult};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a free-form place name to coordinates
    ///
    /// Returns `Ok(None)` when the provider has no match.
    async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, GeocodingError>;
}

/// Cache key for a place name: trimmed, lower-cased, inner whitespace collapsed
#[must_use]
pub fn normalize_place(place: &str) -> String {
    place
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Option<GeoLocation>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConfigurationError(e.to_string()))?;

        let cache = config.cache_enabled().then(|| {
            Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.cache_ttl_hours * 3600))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Number of cached entries (hits and misses)
    pub async fn cached_entries(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            },
            None => 0,
        }
    }

    /// Enforce the configured minimum spacing between upstream requests
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn lookup(&self, key: &str, query: &str) -> Result<Option<GeoLocation>, GeocodingError> {
        let location = self.fetch(query).await?;
        if location.is_none() {
            debug!(%key, "No geocoding match");
        }
        Ok(location)
    }

    async fn fetch(&self, query: &str) -> Result<Option<GeoLocation>, GeocodingError> {
        self.rate_limit().await;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::from_status(status.as_u16()));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let Some(result) = results.first() else {
            return Ok(None);
        };

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid latitude: {}", result.lat)))?;
        let lon: f64 = result
            .lon
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid longitude: {}", result.lon)))?;

        let location =
            GeoLocation::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))?;
        debug!(%lat, %lon, display_name = ?result.display_name, "Geocoded place");

        Ok(Some(location))
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> Result<Option<GeoLocation>, GeocodingError> {
        let key = normalize_place(place);
        if key.is_empty() {
            return Ok(None);
        }

        let query = place.split_whitespace().collect::<Vec<_>>().join(" ");
        let Some(cache) = &self.cache else {
            return self.lookup(&key, &query).await;
        };

        // Concurrent misses on one key share a single upstream request; errors are not stored
        cache
            .try_get_with(key.clone(), self.lookup(&key, &query))
            .await
            .map_err(Arc::unwrap_or_clone)
    }
}
