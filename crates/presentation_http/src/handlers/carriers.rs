//! Carrier (load board) CRUD

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{DomainError, Load, LoadStatus, LoadUpdate};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::common::{LoadResponse, LoadsResponse, parse_load_id};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Body of `POST /carriers`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoadRequest {
    pub load_id: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight: Option<f64>,
    pub pickup_datetime: Option<String>,
    pub delivery_datetime: Option<String>,
    pub equipment_type: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub loadboard_rate: Option<f64>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
    pub commodity_type: Option<String>,
    pub num_of_pieces: Option<u32>,
    pub miles: Option<f64>,
    pub dimensions: Option<String>,
    pub status: Option<LoadStatus>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| DomainError::missing_field(field).into())
}

impl TryFrom<CreateLoadRequest> for Load {
    type Error = ApiError;

    fn try_from(req: CreateLoadRequest) -> Result<Self, Self::Error> {
        let load_id = parse_load_id(&required(req.load_id, "load_id")?)?;
        let mut load = Self::new(
            load_id,
            required(req.origin, "origin")?,
            required(req.destination, "destination")?,
            required(req.weight, "weight")?,
        );
        load.pickup_datetime = req.pickup_datetime;
        load.delivery_datetime = req.delivery_datetime;
        load.equipment_type = req.equipment_type;
        load.loadboard_rate = req.loadboard_rate;
        load.notes = req.notes;
        load.commodity_type = req.commodity_type;
        load.num_of_pieces = req.num_of_pieces;
        load.miles = req.miles;
        load.dimensions = req.dimensions;
        load.status = req.status.unwrap_or_default();
        Ok(load)
    }
}

/// Body of `PUT /carriers/{load_id}`; absent fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateLoadRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<String>,
    pub delivery_datetime: Option<String>,
    pub equipment_type: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub loadboard_rate: Option<f64>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
    pub weight: Option<f64>,
    pub commodity_type: Option<String>,
    pub num_of_pieces: Option<u32>,
    pub miles: Option<f64>,
    pub dimensions: Option<String>,
    pub status: Option<LoadStatus>,
}

impl From<UpdateLoadRequest> for LoadUpdate {
    fn from(req: UpdateLoadRequest) -> Self {
        Self {
            origin: req.origin,
            destination: req.destination,
            pickup_datetime: req.pickup_datetime,
            delivery_datetime: req.delivery_datetime,
            equipment_type: req.equipment_type,
            loadboard_rate: req.loadboard_rate,
            notes: req.notes,
            weight: req.weight,
            commodity_type: req.commodity_type,
            num_of_pieces: req.num_of_pieces,
            miles: req.miles,
            dimensions: req.dimensions,
            status: req.status,
        }
    }
}

/// `GET /carriers`
#[instrument(skip_all)]
pub async fn list_carriers(State(state): State<AppState>) -> Result<Json<LoadsResponse>, ApiError> {
    let loads = state.load_service.list_loads().await?;
    Ok(Json(loads.into()))
}

/// `POST /carriers`
#[instrument(skip_all)]
pub async fn create_carrier(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateLoadRequest>,
) -> Result<(StatusCode, Json<LoadResponse>), ApiError> {
    let load = state.load_service.create_load(Load::try_from(req)?).await?;
    Ok((StatusCode::CREATED, Json(LoadResponse { load })))
}

/// `GET /carriers/{load_id}`
#[instrument(skip(state))]
pub async fn get_carrier(
    State(state): State<AppState>,
    Path(load_id): Path<String>,
) -> Result<Json<LoadResponse>, ApiError> {
    let load = state.load_service.get_load(&parse_load_id(&load_id)?).await?;
    Ok(Json(LoadResponse { load }))
}

/// `PUT /carriers/{load_id}`
#[instrument(skip(state, req))]
pub async fn update_carrier(
    State(state): State<AppState>,
    Path(load_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateLoadRequest>,
) -> Result<Json<LoadResponse>, ApiError> {
    let load = state
        .load_service
        .update_load(&parse_load_id(&load_id)?, req.into())
        .await?;
    Ok(Json(LoadResponse { load }))
}

/// `DELETE /carriers/{load_id}`
#[instrument(skip(state))]
pub async fn delete_carrier(
    State(state): State<AppState>,
    Path(load_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .load_service
        .delete_load(&parse_load_id(&load_id)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
