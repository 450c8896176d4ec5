//! Webhook endpoint for the negotiation agent
//!
//! `POST /webhook` books a load once the agent has agreed a rate with a
//! carrier. `GET /webhook` answers the agent's lookups: a single load, the
//! load closest to a city, or the whole board.

use application::BookingRequest;
use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use domain::NumericInput;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use super::common::{LoadResponse, LoadsResponse, closest_outcome_response, parse_load_id};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Identifier sent either as a JSON string or a bare number (`"1023"` / `1023`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdentifierInput {
    Text(String),
    Number(serde_json::Number),
}

impl IdentifierInput {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Negotiation result posted by the agent
#[derive(Debug, Deserialize, Validate)]
pub struct WebhookPayload {
    #[serde(default)]
    pub mc_num: Option<IdentifierInput>,
    #[serde(default)]
    pub chosen_id: Option<IdentifierInput>,
    #[serde(default)]
    pub initial_rate: Option<NumericInput>,
    #[serde(default)]
    pub final_rate: Option<NumericInput>,
    #[validate(length(max = 100_000, message = "must be at most 100000 characters"))]
    #[serde(default)]
    pub transcript: Option<String>,
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub duration: Option<NumericInput>,
}

impl From<WebhookPayload> for BookingRequest {
    fn from(payload: WebhookPayload) -> Self {
        Self {
            mc_num: payload.mc_num.map(IdentifierInput::into_text),
            chosen_id: payload.chosen_id.map(IdentifierInput::into_text),
            initial_rate: payload.initial_rate,
            final_rate: payload.final_rate,
            transcript: payload.transcript,
            sentiment: payload.sentiment,
            duration: payload.duration,
        }
    }
}

/// `POST /webhook` - book the chosen load
#[instrument(skip_all)]
pub async fn book_load(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<WebhookPayload>,
) -> Result<Response, ApiError> {
    let outcome = state.booking_service.book(payload.into()).await?;

    info!(
        load_id = %outcome.load.load_id,
        mc_num = %outcome.booking.mc_num,
        rate_difference = ?outcome.rate_difference,
        "Webhook booking processed"
    );
    Ok(Json(outcome).into_response())
}

/// Lookup parameters for `GET /webhook`
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    pub city: Option<String>,
    pub load_id: Option<String>,
}

/// `GET /webhook` - `city` wins over `load_id`; neither lists every load
#[instrument(skip(state))]
pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<WebhookQuery>,
) -> Result<Response, ApiError> {
    if let Some(city) = query.city {
        let outcome = state.closest_service.closest(&city).await?;
        return Ok(closest_outcome_response(outcome));
    }

    if let Some(raw_id) = query.load_id {
        let load_id = parse_load_id(&raw_id)?;
        let load = state.load_service.get_load(&load_id).await?;
        return Ok(Json(LoadResponse { load }).into_response());
    }

    let loads = state.load_service.list_loads().await?;
    Ok(Json(LoadsResponse::from(loads)).into_response())
}
