//! Validated JSON bodies
//!
//! [`ValidatedJson`] deserializes a request body and runs its `validator`
//! rules before the handler sees it. Both failure kinds answer 400 with the
//! standard error body.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ErrorResponse;

/// Body extraction failure
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    Failed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::InvalidJson(e) => ErrorResponse::new(e.body_text(), "invalid_json"),
            Self::Failed(msg) => ErrorResponse::new(msg.clone(), "validation_error"),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// JSON extractor that also runs `validator` rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|e| ValidationError::Failed(describe(&e)))?;
        Ok(Self(value))
    }
}

/// `field: message` pairs, sorted by field for stable output
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
