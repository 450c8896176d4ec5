//! Distance queries

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use domain::{GeoLocation, Load};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::common::{closest_outcome_response, parse_load_id, round_miles};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct ClosestQuery {
    pub city: Option<String>,
}

/// `GET /distance/closest?city=`
#[instrument(skip(state))]
pub async fn closest_load(
    State(state): State<AppState>,
    Query(query): Query<ClosestQuery>,
) -> Result<Response, ApiError> {
    let city = query
        .city
        .ok_or_else(|| ApiError::BadRequest("city query parameter is required".to_string()))?;
    let outcome = state.closest_service.closest(&city).await?;
    Ok(closest_outcome_response(outcome))
}

/// Route details of one load
#[derive(Debug, Serialize)]
pub struct LoadDistanceResponse {
    pub load: Load,
    pub origin_location: Option<GeoLocation>,
    pub destination_location: Option<GeoLocation>,
    /// `null` when either end could not be located
    pub route_distance_miles: Option<f64>,
}

/// `GET /distance/load/{load_id}`
#[instrument(skip(state))]
pub async fn load_distance(
    State(state): State<AppState>,
    Path(load_id): Path<String>,
) -> Result<Json<LoadDistanceResponse>, ApiError> {
    let route = state
        .closest_service
        .route_distance(&parse_load_id(&load_id)?)
        .await?;

    Ok(Json(LoadDistanceResponse {
        load: route.load,
        origin_location: route.origin_location,
        destination_location: route.destination_location,
        route_distance_miles: route.distance_miles.map(round_miles),
    }))
}
