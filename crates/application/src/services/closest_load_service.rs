//! Closest-load query
//!
//! Ranks the board's loads by how close either end of the route is to a
//! city, and computes great-circle route lengths for single loads.

use std::{fmt, sync::Arc};

use domain::{GeoLocation, Load, LoadId};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{GeocodingPort, LoadStore},
};

/// Configuration for the closest-load query
#[derive(Debug, Clone)]
pub struct ClosestLoadConfig {
    /// Number of ranked loads returned (default: 5)
    pub max_ranked: usize,
}

impl Default for ClosestLoadConfig {
    fn default() -> Self {
        Self { max_ranked: 5 }
    }
}

/// A load scored against the query city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLoad {
    pub load: Load,
    pub origin_location: GeoLocation,
    pub destination_location: GeoLocation,
    pub distance_to_origin_miles: f64,
    pub distance_to_destination_miles: f64,
    /// Score used for ranking: the nearer of the two ends
    pub min_distance_miles: f64,
}

/// Successful closest-load answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestLoadReport {
    pub city: String,
    pub city_location: GeoLocation,
    pub closest: RankedLoad,
    /// Nearest loads first, truncated to `max_ranked`
    pub ranked: Vec<RankedLoad>,
    /// Every load fetched, including the ones that could not be located
    pub total_loads_checked: usize,
}

/// Outcome of a closest-load query
#[derive(Debug, Clone, PartialEq)]
pub enum ClosestLoadOutcome {
    Found(ClosestLoadReport),
    /// The query city itself could not be geocoded
    CityNotFound { city: String },
    /// The city resolved but no load had both ends resolvable
    NoLoadsWithCoordinates {
        city: String,
        city_location: GeoLocation,
        total_loads_checked: usize,
    },
}

/// Route length of a single load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDistance {
    pub load: Load,
    pub origin_location: Option<GeoLocation>,
    pub destination_location: Option<GeoLocation>,
    /// `None` when either end could not be located
    pub distance_miles: Option<f64>,
}

/// Service answering proximity queries over the load board
#[derive(Clone)]
pub struct ClosestLoadService {
    store: Arc<dyn LoadStore>,
    geocoder: Arc<dyn GeocodingPort>,
    config: ClosestLoadConfig,
}

impl fmt::Debug for ClosestLoadService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosestLoadService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClosestLoadService {
    /// Create a new closest-load service
    #[must_use]
    pub fn new(
        store: Arc<dyn LoadStore>,
        geocoder: Arc<dyn GeocodingPort>,
        config: ClosestLoadConfig,
    ) -> Self {
        Self {
            store,
            geocoder,
            config,
        }
    }

    /// Find the load whose origin or destination is nearest to `city`
    ///
    /// # Errors
    /// `Validation` for a blank city, `ExternalService` when the geocoder is
    /// unavailable for the city itself, storage errors from the store.
    #[instrument(skip(self))]
    pub async fn closest(&self, city: &str) -> Result<ClosestLoadOutcome, ApplicationError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ApplicationError::Validation(
                "city must not be empty".to_string(),
            ));
        }

        let Some(city_location) = self.geocoder.geocode(city).await? else {
            info!(city, "Query city could not be geocoded");
            return Ok(ClosestLoadOutcome::CityNotFound {
                city: city.to_string(),
            });
        };

        let loads = self.store.list_all().await?;
        let total_loads_checked = loads.len();

        let located = join_all(loads.into_iter().map(|load| self.locate(load))).await;

        let mut ranked: Vec<RankedLoad> = located
            .into_iter()
            .flatten()
            .map(|(load, origin, destination)| {
                let to_origin = city_location.distance_miles(&origin);
                let to_destination = city_location.distance_miles(&destination);
                RankedLoad {
                    load,
                    origin_location: origin,
                    destination_location: destination,
                    distance_to_origin_miles: to_origin,
                    distance_to_destination_miles: to_destination,
                    min_distance_miles: to_origin.min(to_destination),
                }
            })
            .collect();

        // Stable: equal scores keep store order
        ranked.sort_by(|a, b| a.min_distance_miles.total_cmp(&b.min_distance_miles));

        let Some(closest) = ranked.first().cloned() else {
            info!(city, total_loads_checked, "No load could be located");
            return Ok(ClosestLoadOutcome::NoLoadsWithCoordinates {
                city: city.to_string(),
                city_location,
                total_loads_checked,
            });
        };

        debug!(
            city,
            closest = %closest.load.load_id,
            distance = closest.min_distance_miles,
            located = ranked.len(),
            total_loads_checked,
            "Ranked loads"
        );

        ranked.truncate(self.config.max_ranked);

        Ok(ClosestLoadOutcome::Found(ClosestLoadReport {
            city: city.to_string(),
            city_location,
            closest,
            ranked,
            total_loads_checked,
        }))
    }

    /// Great-circle length of a load's route
    ///
    /// # Errors
    /// `NotFound` for an unknown load id.
    #[instrument(skip_all, fields(load_id = %load_id))]
    pub async fn route_distance(&self, load_id: &LoadId) -> Result<RouteDistance, ApplicationError> {
        let load = self
            .store
            .get(load_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Load {load_id}")))?;

        let (origin, destination) = tokio::join!(
            self.geocode_lenient(&load.origin),
            self.geocode_lenient(&load.destination)
        );

        let distance_miles = match (origin, destination) {
            (Some(o), Some(d)) => Some(o.distance_miles(&d)),
            _ => None,
        };

        Ok(RouteDistance {
            load,
            origin_location: origin,
            destination_location: destination,
            distance_miles,
        })
    }

    /// Resolve both ends of a load; `None` excludes the load from ranking
    async fn locate(&self, load: Load) -> Option<(Load, GeoLocation, GeoLocation)> {
        let (origin, destination) = tokio::join!(
            self.geocode_lenient(&load.origin),
            self.geocode_lenient(&load.destination)
        );
        match (origin, destination) {
            (Some(o), Some(d)) => Some((load, o, d)),
            _ => {
                debug!(load_id = %load.load_id, "Excluding load without coordinates");
                None
            },
        }
    }

    /// Geocode, treating provider failures as "unknown place"
    async fn geocode_lenient(&self, place: &str) -> Option<GeoLocation> {
        match self.geocoder.geocode(place).await {
            Ok(location) => location,
            Err(e) => {
                warn!(place, error = %e, "Geocoding failed, treating place as unresolved");
                None
            },
        }
    }
}
