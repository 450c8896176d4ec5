//! Response shapes shared by several handlers

use application::{ClosestLoadOutcome, RankedLoad};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{GeoLocation, Load, LoadId};
use serde::Serialize;

use crate::error::{ApiError, ErrorResponse};

/// Round a distance to one decimal place
pub fn round_miles(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

/// Parse a load id taken from a path or query string
pub fn parse_load_id(raw: &str) -> Result<LoadId, ApiError> {
    LoadId::parse(raw).map_err(ApiError::from)
}

/// A single load
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub load: Load,
}

/// Every load on the board
#[derive(Debug, Serialize)]
pub struct LoadsResponse {
    pub count: usize,
    pub loads: Vec<Load>,
}

impl From<Vec<Load>> for LoadsResponse {
    fn from(loads: Vec<Load>) -> Self {
        Self {
            count: loads.len(),
            loads,
        }
    }
}

/// One entry of the proximity ranking
#[derive(Debug, Serialize)]
pub struct RankedLoadResponse {
    pub load: Load,
    pub origin_location: GeoLocation,
    pub destination_location: GeoLocation,
    pub distance_to_origin_miles: f64,
    pub distance_to_destination_miles: f64,
    pub min_distance_miles: f64,
}

impl From<RankedLoad> for RankedLoadResponse {
    fn from(ranked: RankedLoad) -> Self {
        Self {
            load: ranked.load,
            origin_location: ranked.origin_location,
            destination_location: ranked.destination_location,
            distance_to_origin_miles: round_miles(ranked.distance_to_origin_miles),
            distance_to_destination_miles: round_miles(ranked.distance_to_destination_miles),
            min_distance_miles: round_miles(ranked.min_distance_miles),
        }
    }
}

/// Successful closest-load answer
#[derive(Debug, Serialize)]
pub struct ClosestLoadResponse {
    pub city: String,
    pub city_location: GeoLocation,
    pub closest_load: Load,
    pub closest_distance_miles: f64,
    pub ranked: Vec<RankedLoadResponse>,
    pub total_loads_checked: usize,
}

/// Not-found style answers of the closest-load query
#[derive(Debug, Serialize)]
struct UnresolvedResponse {
    #[serde(flatten)]
    error: ErrorResponse,
    city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    city_location: Option<GeoLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_loads_checked: Option<usize>,
}

/// Render a closest-load outcome: 200 when found, typed 404 otherwise
pub fn closest_outcome_response(outcome: ClosestLoadOutcome) -> Response {
    match outcome {
        ClosestLoadOutcome::Found(report) => {
            let closest_distance_miles = round_miles(report.closest.min_distance_miles);
            Json(ClosestLoadResponse {
                city: report.city,
                city_location: report.city_location,
                closest_load: report.closest.load,
                closest_distance_miles,
                ranked: report.ranked.into_iter().map(Into::into).collect(),
                total_loads_checked: report.total_loads_checked,
            })
            .into_response()
        },
        ClosestLoadOutcome::CityNotFound { city } => (
            StatusCode::NOT_FOUND,
            Json(UnresolvedResponse {
                error: ErrorResponse::new(
                    format!("Could not find coordinates for {city}"),
                    "city_not_found",
                ),
                city,
                city_location: None,
                total_loads_checked: None,
            }),
        )
            .into_response(),
        ClosestLoadOutcome::NoLoadsWithCoordinates {
            city,
            city_location,
            total_loads_checked,
        } => (
            StatusCode::NOT_FOUND,
            Json(UnresolvedResponse {
                error: ErrorResponse::new(
                    "No loads found with valid coordinates",
                    "no_loads_with_coordinates",
                ),
                city,
                city_location: Some(city_location),
                total_loads_checked: Some(total_loads_checked),
            }),
        )
            .into_response(),
    }
}
