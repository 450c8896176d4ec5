//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during geocoding
///
/// "No such place" is not an error; the client returns `Ok(None)` for it.
#[derive(Debug, Clone, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request was rejected by the geocoding service
    #[error("Geocoding request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code returned
        status: u16,
    },

    /// Upstream rate limit hit (HTTP 429)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Upstream server error (HTTP 5xx)
    #[error("Geocoding service unavailable: HTTP {status}")]
    ServiceUnavailable {
        /// HTTP status code returned
        status: u16,
    },

    /// Failed to parse the geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Client could not be configured
    #[error("Geocoding configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Map a non-success HTTP status to an error
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimitExceeded,
            500..=599 => Self::ServiceUnavailable { status },
            _ => Self::RequestFailed { status },
        }
    }

    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RateLimitExceeded
                | Self::ServiceUnavailable { .. }
                | Self::Timeout
        )
    }
}
