//! Nominatim API response models

use serde::Deserialize;

/// One entry of a Nominatim `/search` response
///
/// Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: Option<String>,
}
