//! Geocoding integration for the load broker
//!
//! Resolves free-text place names ("Chicago, IL") to coordinates via the
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org) search API.
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the interface, implemented by
//! [`NominatimGeocodingClient`]. The client honours Nominatim's usage policy
//! (one request per ~1.1 s), applies a request timeout and keeps a TTL cache
//! of both hits and confirmed misses keyed by the normalized place name.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_geocoding::{GeocodingClient, NominatimConfig, NominatimGeocodingClient};
//!
//! let client = NominatimGeocodingClient::new(&NominatimConfig::default())?;
//! if let Some(location) = client.geocode("Dallas, TX").await? {
//!     println!("{location}");
//! }
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GeocodingClient, NominatimGeocodingClient, normalize_place};
pub use config::NominatimConfig;
pub use error::GeocodingError;
