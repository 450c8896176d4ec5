//! Application state shared across handlers

use std::sync::Arc;

use application::{BookingService, ClosestLoadService, GeocodingPort, LoadService, LoadStore};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Load CRUD and booking log reads
    pub load_service: Arc<LoadService>,
    /// Webhook booking workflow
    pub booking_service: Arc<BookingService>,
    /// Proximity queries
    pub closest_service: Arc<ClosestLoadService>,
    /// Whether the API-key gate is active (shown on the index)
    pub auth_enabled: bool,
}

impl AppState {
    /// Wire the services around one store and one geocoder
    pub fn new(
        store: Arc<dyn LoadStore>,
        geocoder: Arc<dyn GeocodingPort>,
        config: &AppConfig,
    ) -> Self {
        Self {
            load_service: Arc::new(LoadService::new(Arc::clone(&store))),
            booking_service: Arc::new(BookingService::new(
                Arc::clone(&store),
                config.booking.to_service_config(),
            )),
            closest_service: Arc::new(ClosestLoadService::new(
                store,
                geocoder,
                config.closest.to_service_config(),
            )),
            auth_enabled: config.security.effective_api_key().is_some(),
        }
    }
}
