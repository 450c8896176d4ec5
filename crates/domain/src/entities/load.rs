//! Load entity - a freight listing on the load board
//!
//! Loads are also called "carrier records" by the board's operators. A load
//! is created from seed data or an explicit create, edited by partial
//! updates, and flipped to `booked` by the booking workflow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{LoadId, LoadStatus};

/// A freight load offered to carriers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    /// Board-assigned identifier
    pub load_id: LoadId,
    /// Pickup place, free text ("Los Angeles, CA")
    pub origin: String,
    /// Drop-off place, free text
    pub destination: String,
    /// Pickup time as published by the board (opaque text)
    pub pickup_datetime: Option<String>,
    /// Delivery time as published by the board (opaque text)
    pub delivery_datetime: Option<String>,
    /// Trailer type ("Dry Van", "Reefer", ...)
    pub equipment_type: Option<String>,
    /// Posted rate in dollars
    pub loadboard_rate: Option<f64>,
    /// Handling notes
    pub notes: Option<String>,
    /// Weight in pounds
    pub weight: f64,
    /// What is being hauled
    pub commodity_type: Option<String>,
    /// Piece count
    pub num_of_pieces: Option<u32>,
    /// Route length in miles as published by the board
    pub miles: Option<f64>,
    /// Free-text dimensions ("48x48x96")
    pub dimensions: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: LoadStatus,
    /// Agreed rate, set when booked
    #[serde(default)]
    pub final_rate: Option<f64>,
    /// When the load was booked
    #[serde(default)]
    pub booked_at: Option<DateTime<Utc>>,
}

impl Load {
    /// Create a pending load with only the mandatory attributes
    #[must_use]
    pub fn new(
        load_id: LoadId,
        origin: impl Into<String>,
        destination: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            load_id,
            origin: origin.into(),
            destination: destination.into(),
            pickup_datetime: None,
            delivery_datetime: None,
            equipment_type: None,
            loadboard_rate: None,
            notes: None,
            weight,
            commodity_type: None,
            num_of_pieces: None,
            miles: None,
            dimensions: None,
            status: LoadStatus::Pending,
            final_rate: None,
            booked_at: None,
        }
    }

    /// Set pickup and delivery times
    #[must_use]
    pub fn with_schedule(mut self, pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        self.pickup_datetime = Some(pickup.into());
        self.delivery_datetime = Some(delivery.into());
        self
    }

    /// Set the pickup time only
    #[must_use]
    pub fn with_pickup_datetime(mut self, pickup: impl Into<String>) -> Self {
        self.pickup_datetime = Some(pickup.into());
        self
    }

    /// Set the equipment type
    #[must_use]
    pub fn with_equipment_type(mut self, equipment: impl Into<String>) -> Self {
        self.equipment_type = Some(equipment.into());
        self
    }

    /// Set the posted rate
    #[must_use]
    pub const fn with_loadboard_rate(mut self, rate: f64) -> Self {
        self.loadboard_rate = Some(rate);
        self
    }

    /// Set the commodity
    #[must_use]
    pub fn with_commodity_type(mut self, commodity: impl Into<String>) -> Self {
        self.commodity_type = Some(commodity.into());
        self
    }

    /// Set handling notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the piece count
    #[must_use]
    pub const fn with_num_of_pieces(mut self, pieces: u32) -> Self {
        self.num_of_pieces = Some(pieces);
        self
    }

    /// Set the route length
    #[must_use]
    pub const fn with_miles(mut self, miles: f64) -> Self {
        self.miles = Some(miles);
        self
    }

    /// Set the dimensions
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = Some(dimensions.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn with_status(mut self, status: LoadStatus) -> Self {
        self.status = status;
        self
    }

    /// Check attribute invariants
    ///
    /// # Errors
    /// Returns `MissingField` for blank places and `ValidationError` for
    /// non-positive weight, negative miles or a non-finite rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.origin.trim().is_empty() {
            return Err(DomainError::missing_field("origin"));
        }
        if self.destination.trim().is_empty() {
            return Err(DomainError::missing_field("destination"));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(DomainError::ValidationError(
                "weight must be a positive number".to_string(),
            ));
        }
        if let Some(miles) = self.miles {
            if !miles.is_finite() || miles < 0.0 {
                return Err(DomainError::ValidationError(
                    "miles must be a non-negative number".to_string(),
                ));
            }
        }
        if let Some(rate) = self.loadboard_rate {
            if !rate.is_finite() {
                return Err(DomainError::ValidationError(
                    "loadboard_rate must be a finite number".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Record a booking at the agreed rate
    pub fn mark_booked(&mut self, final_rate: Option<f64>, at: DateTime<Utc>) {
        self.status = LoadStatus::Booked;
        self.final_rate = final_rate;
        self.booked_at = Some(at);
    }
}

/// Partial update of a load; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadUpdate {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub pickup_datetime: Option<String>,
    pub delivery_datetime: Option<String>,
    pub equipment_type: Option<String>,
    pub loadboard_rate: Option<f64>,
    pub notes: Option<String>,
    pub weight: Option<f64>,
    pub commodity_type: Option<String>,
    pub num_of_pieces: Option<u32>,
    pub miles: Option<f64>,
    pub dimensions: Option<String>,
    pub status: Option<LoadStatus>,
}

impl LoadUpdate {
    /// Whether the update carries no field at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.origin.is_none()
            && self.destination.is_none()
            && self.pickup_datetime.is_none()
            && self.delivery_datetime.is_none()
            && self.equipment_type.is_none()
            && self.loadboard_rate.is_none()
            && self.notes.is_none()
            && self.weight.is_none()
            && self.commodity_type.is_none()
            && self.num_of_pieces.is_none()
            && self.miles.is_none()
            && self.dimensions.is_none()
            && self.status.is_none()
    }

    /// Apply the present fields onto a load
    ///
    /// Moving a load out of `booked` drops its agreed rate and booking time.
    pub fn apply(&self, load: &mut Load) {
        fn set<T: Clone>(target: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        set(&mut load.origin, self.origin.as_ref());
        set(&mut load.destination, self.destination.as_ref());
        set_opt(&mut load.pickup_datetime, self.pickup_datetime.as_ref());
        set_opt(&mut load.delivery_datetime, self.delivery_datetime.as_ref());
        set_opt(&mut load.equipment_type, self.equipment_type.as_ref());
        set_opt(&mut load.loadboard_rate, self.loadboard_rate.as_ref());
        set_opt(&mut load.notes, self.notes.as_ref());
        set(&mut load.weight, self.weight.as_ref());
        set_opt(&mut load.commodity_type, self.commodity_type.as_ref());
        set_opt(&mut load.num_of_pieces, self.num_of_pieces.as_ref());
        set_opt(&mut load.miles, self.miles.as_ref());
        set_opt(&mut load.dimensions, self.dimensions.as_ref());
        set(&mut load.status, self.status.as_ref());

        if !load.status.is_booked() {
            load.final_rate = None;
            load.booked_at = None;
        }
    }
}
