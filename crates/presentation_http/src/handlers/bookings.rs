//! Booking audit log

use axum::{Json, extract::State};
use domain::BookingRecord;
use serde::Serialize;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub count: usize,
    pub bookings: Vec<BookingRecord>,
}

/// `GET /bookings` - newest first, each with its load when it still exists
#[instrument(skip_all)]
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<BookingsResponse>, ApiError> {
    let bookings = state.load_service.list_bookings().await?;
    Ok(Json(BookingsResponse {
        count: bookings.len(),
        bookings,
    }))
}
