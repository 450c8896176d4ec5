//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in statute miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A geographic location with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180] (NaN is rejected as well)
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another location in miles
    ///
    /// Haversine formula with central angle `2·asin(√a)` over a
    /// 3959-mile mean Earth radius.
    #[must_use]
    pub fn distance_miles(&self, other: &Self) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        // Rounding can push `a` a hair above 1.0 for antipodal points
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

        EARTH_RADIUS_MILES * c
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHICAGO: GeoLocation = GeoLocation::new_unchecked(41.8781, -87.6298);
    const DALLAS: GeoLocation = GeoLocation::new_unchecked(32.7767, -96.797);

    #[test]
    fn test_valid_coordinates() {
        let loc = GeoLocation::new(41.8781, -87.6298).expect("valid coordinates");
        assert!((loc.latitude() - 41.8781).abs() < f64::EPSILON);
        assert!((loc.longitude() + 87.6298).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoLocation::new(90.0, 180.0).is_ok());
        assert!(GeoLocation::new(-90.0, -180.0).is_ok());
        assert!(GeoLocation::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(GeoLocation::new(91.0, 0.0).is_err());
        assert!(GeoLocation::new(0.0, -181.0).is_err());
        assert!(GeoLocation::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_same_location() {
        let loc = CHICAGO;
        assert!(loc.distance_miles(&loc).abs() < 1e-9);
    }

    #[test]
    fn test_distance_along_meridian() {
        // 2.5 degrees of latitude is 2.5 * pi / 180 * 3959 miles
        let a = GeoLocation::new(40.0, -100.0).expect("valid");
        let b = GeoLocation::new(42.5, -100.0).expect("valid");
        let expected = 2.5_f64.to_radians() * EARTH_RADIUS_MILES;
        assert!((a.distance_miles(&b) - expected).abs() < 1e-6);
        assert!((a.distance_miles(&b) - 172.75).abs() < 0.01);
    }

    #[test]
    fn test_distance_dallas_chicago() {
        let distance = DALLAS.distance_miles(&CHICAGO);
        // Roughly 800 miles as the crow flies
        assert!((distance - 800.0).abs() < 25.0);
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let a = GeoLocation::new(0.0, 0.0).expect("valid");
        let b = GeoLocation::new(0.0, 180.0).expect("valid");
        let expected = std::f64::consts::PI * EARTH_RADIUS_MILES;
        assert!((a.distance_miles(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_display() {
        let display = CHICAGO.to_string();
        assert!(display.contains("41.878100"));
        assert!(display.contains("-87.629800"));
    }

    #[test]
    fn test_serialization() {
        let loc = GeoLocation::new(32.7767, -96.797).expect("valid");
        let json = serde_json::to_string(&loc).expect("serialize");
        assert!(json.contains("32.7767"));
        let deserialized: GeoLocation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loc, deserialized);
    }
}
