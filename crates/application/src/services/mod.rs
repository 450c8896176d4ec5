//! Application services - Use case implementations

mod booking_service;
mod closest_load_service;
mod load_service;

pub use booking_service::{BookingOutcome, BookingRequest, BookingService, BookingServiceConfig};
pub use closest_load_service::{
    ClosestLoadConfig, ClosestLoadOutcome, ClosestLoadReport, ClosestLoadService, RankedLoad,
    RouteDistance,
};
pub use load_service::LoadService;
