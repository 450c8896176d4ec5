//! HTTP middleware components
//!
//! API-key gate, request ids and validated JSON extraction.

pub mod auth;
pub mod request_id;
pub mod validation;

pub use auth::{ApiKeyAuth, ApiKeyAuthLayer};
pub use request_id::{MakeRequestUuidV7, REQUEST_ID_HEADER, make_request_span};
pub use validation::{ValidatedJson, ValidationError};
