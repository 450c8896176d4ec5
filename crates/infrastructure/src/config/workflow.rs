//! Booking and closest-load query settings.

use application::{BookingServiceConfig, ClosestLoadConfig};
use serde::{Deserialize, Serialize};

/// Booking workflow settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingAppConfig {
    /// Accept bookings for loads already booked (logged as a warning)
    #[serde(default)]
    pub allow_rebooking: bool,
}

impl BookingAppConfig {
    /// Convert to the service configuration
    #[must_use]
    pub const fn to_service_config(&self) -> BookingServiceConfig {
        BookingServiceConfig {
            allow_rebooking: self.allow_rebooking,
        }
    }
}

/// Closest-load query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosestAppConfig {
    /// Number of ranked loads in a response (default: 5)
    #[serde(default = "default_max_ranked")]
    pub max_ranked: usize,
}

const fn default_max_ranked() -> usize {
    5
}

impl Default for ClosestAppConfig {
    fn default() -> Self {
        Self {
            max_ranked: default_max_ranked(),
        }
    }
}

impl ClosestAppConfig {
    /// Convert to the service configuration
    #[must_use]
    pub const fn to_service_config(&self) -> ClosestLoadConfig {
        ClosestLoadConfig {
            max_ranked: self.max_ranked,
        }
    }
}
