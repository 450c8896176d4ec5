//! Booking workflow
//!
//! Turns a negotiation payload from the voice agent into a booked load and
//! an audit record. Everything that can be checked without storage is
//! checked first, so a malformed payload never touches the store.

use std::{fmt, sync::Arc};

use domain::{
    Booking, CallDuration, DomainError, Load, LoadId, McNumber, NumericInput, Rate,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{error::ApplicationError, ports::LoadStore};

/// Configuration for the booking workflow
#[derive(Debug, Clone, Default)]
pub struct BookingServiceConfig {
    /// Accept a booking for a load that is already booked (default: false)
    pub allow_rebooking: bool,
}

/// Raw negotiation payload as received from the agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingRequest {
    pub mc_num: Option<String>,
    pub chosen_id: Option<String>,
    pub initial_rate: Option<NumericInput>,
    pub final_rate: Option<NumericInput>,
    pub transcript: Option<String>,
    pub sentiment: Option<String>,
    pub duration: Option<NumericInput>,
}

/// Result of a successful booking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOutcome {
    pub load: Load,
    pub booking: Booking,
    /// `final_rate - initial_rate` when both were given
    pub rate_difference: Option<f64>,
}

/// Payload after validation, ready to hit the store
struct ValidatedBooking {
    load_id: LoadId,
    booking: Booking,
}

/// Service executing the booking workflow
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn LoadStore>,
    config: BookingServiceConfig,
}

impl fmt::Debug for BookingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BookingService {
    /// Create a new booking service
    #[must_use]
    pub fn new(store: Arc<dyn LoadStore>, config: BookingServiceConfig) -> Self {
        Self { store, config }
    }

    /// Book the chosen load for the carrier
    ///
    /// # Errors
    /// - `Validation` for a missing or malformed field (no store access)
    /// - `NotFound` for an unknown load (nothing written)
    /// - `Conflict` when the load is already booked and rebooking is off
    #[instrument(skip_all, fields(chosen_id = ?request.chosen_id))]
    pub async fn book(&self, request: BookingRequest) -> Result<BookingOutcome, ApplicationError> {
        let ValidatedBooking { load_id, booking } = Self::validate(request)?;

        let load = self
            .store
            .get(&load_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Load {load_id}")))?;

        if load.status.is_booked() {
            if !self.config.allow_rebooking {
                return Err(ApplicationError::Conflict(format!(
                    "Load {load_id} is already booked"
                )));
            }
            warn!(
                load_id = %load_id,
                mc_num = %booking.mc_num,
                "Rebooking a load that is already booked"
            );
        }

        let booked = self
            .store
            .book_load(&load_id, &booking, self.config.allow_rebooking)
            .await?;
        let rate_difference = booked.booking.rate_difference();

        info!(
            load_id = %load_id,
            mc_num = %booked.booking.mc_num,
            booking_id = ?booked.booking.id,
            rate_difference = ?rate_difference,
            "Load booked"
        );

        Ok(BookingOutcome {
            load: booked.load,
            booking: booked.booking,
            rate_difference,
        })
    }

    fn validate(request: BookingRequest) -> Result<ValidatedBooking, ApplicationError> {
        let mc_num = match request.mc_num.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                McNumber::parse(raw).map_err(|e| ApplicationError::invalid_field("mc_num", &e))?
            },
            _ => return Err(missing("mc_num")),
        };

        let load_id = match request.chosen_id.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                LoadId::parse(raw).map_err(|e| ApplicationError::invalid_field("chosen_id", &e))?
            },
            _ => return Err(missing("chosen_id")),
        };

        let initial_rate = request
            .initial_rate
            .map(Rate::try_from)
            .transpose()
            .map_err(|e| ApplicationError::invalid_field("initial_rate", &e))?;
        let final_rate = request
            .final_rate
            .map(Rate::try_from)
            .transpose()
            .map_err(|e| ApplicationError::invalid_field("final_rate", &e))?;
        let duration = request
            .duration
            .map(CallDuration::try_from)
            .transpose()
            .map_err(|e| ApplicationError::invalid_field("duration", &e))?;

        let booking = Booking::new(load_id.clone(), mc_num)
            .with_rates(initial_rate, final_rate)
            .with_transcript(non_blank(request.transcript))
            .with_sentiment(non_blank(request.sentiment))
            .with_duration(duration);

        Ok(ValidatedBooking { load_id, booking })
    }
}

fn missing(field: &str) -> ApplicationError {
    ApplicationError::Validation(DomainError::missing_field(field).to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
