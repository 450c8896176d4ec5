//! Load broker HTTP presentation layer
//!
//! Axum router, handlers and middleware for the webhook, load board and
//! distance endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{ApiKeyAuthLayer, ValidatedJson, ValidationError};
pub use routes::{create_app, create_router};
pub use state::AppState;
