//! Adapters implementing application ports on top of integration crates

mod geocoding_adapter;

pub use geocoding_adapter::GeocodingAdapter;
