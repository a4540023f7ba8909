//! Great-circle distance between GPS samples.
//!
//! Inputs may be missing or garbage (NaN from a flaky device). Instead of
//! failing, the distance degrades to [`UNREACHABLE_KM`], which is larger
//! than every threshold the matcher compares against.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance reported when either side of a measurement is unusable.
pub const UNREACHABLE_KM: f64 = 1.0e9;

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees. No validation.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a point only when both parts are present and finite.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        let point = Self::new(lat?, lon?);
        point.is_valid().then_some(point)
    }

    /// True when both parts are finite numbers.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// True when the point is valid and inside the lat/lon ranges.
    pub fn in_range(&self) -> bool {
        self.is_valid() && self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

/// Haversine distance in kilometers, unrounded.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Distance between two optional points, or [`UNREACHABLE_KM`] when either
/// is absent or non-finite.
pub fn distance_km(from: Option<GeoPoint>, to: Option<GeoPoint>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) if from.is_valid() && to.is_valid() => haversine_km(from, to),
        _ => UNREACHABLE_KM,
    }
}

/// Rounds a distance to two decimals for display.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
