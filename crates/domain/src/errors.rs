//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid load identifier
    #[error("Invalid load id: {0}")]
    InvalidLoadId(String),

    /// Invalid motor-carrier number
    #[error("Invalid MC number: {0}")]
    InvalidMcNumber(String),

    /// Rate value did not match the accepted numeric grammar
    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    /// Call duration was not a non-negative number of seconds
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Unknown load status label
    #[error("Invalid load status: {0}")]
    InvalidStatus(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}
