//! Load status value object
//!
//! Lifecycle of a load on the board: `pending → calling → ready → booked`.
//! Generic updates may set any status; only the booking workflow treats
//! `booked` as terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Current state of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Listed, nobody contacted yet
    #[default]
    Pending,
    /// A negotiation call is in progress
    Calling,
    /// Ready to be booked
    Ready,
    /// Booked by a carrier
    Booked,
}

impl LoadStatus {
    /// Storage/wire label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Calling => "calling",
            Self::Ready => "ready",
            Self::Booked => "booked",
        }
    }

    /// Whether the load has already been booked
    #[must_use]
    pub const fn is_booked(&self) -> bool {
        matches!(self, Self::Booked)
    }

    /// Whether a booking may be accepted from this state without override
    #[must_use]
    pub const fn is_bookable(&self) -> bool {
        matches!(self, Self::Pending | Self::Calling | Self::Ready)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "calling" => Ok(Self::Calling),
            "ready" => Ok(Self::Ready),
            "booked" => Ok(Self::Booked),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}
