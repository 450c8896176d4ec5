//! Route definitions and middleware stack

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
};
use infrastructure::AppConfig;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handlers,
    middleware::{ApiKeyAuthLayer, MakeRequestUuidV7, make_request_span},
    state::AppState,
};

/// Create the router with all routes, without middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Agent webhook (trailing-slash form kept for existing agent configs)
        .route(
            "/webhook",
            get(handlers::webhook::lookup).post(handlers::webhook::book_load),
        )
        .route(
            "/webhook/",
            get(handlers::webhook::lookup).post(handlers::webhook::book_load),
        )
        // Load board
        .route(
            "/carriers",
            get(handlers::carriers::list_carriers).post(handlers::carriers::create_carrier),
        )
        .route(
            "/carriers/{load_id}",
            get(handlers::carriers::get_carrier)
                .put(handlers::carriers::update_carrier)
                .delete(handlers::carriers::delete_carrier),
        )
        .route("/bookings", get(handlers::bookings::list_bookings))
        // Distance queries
        .route("/distance/closest", get(handlers::distance::closest_load))
        .route(
            "/distance/load/{load_id}",
            get(handlers::distance::load_distance),
        )
        .with_state(state)
}

/// Router plus the full middleware stack, as served by the binary
///
/// Outermost first: request id and trace span, CORS, body limit, API key.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let auth = ApiKeyAuthLayer::new(config.security.effective_api_key().cloned());

    let mut app = create_router(state)
        .layer(auth)
        .layer(DefaultBodyLimit::max(config.server.max_body_size_bytes));

    if config.server.cors_enabled {
        app = app.layer(cors_layer(config));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

/// Any origin in development when none are listed; listed origins otherwise
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() && !config.is_production() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
