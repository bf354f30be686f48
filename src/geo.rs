//! Geographic Positions and Great-Circle Helpers
//!
//! The minimal geodesy the trajectory core consumes: a horizontal position
//! type, spherical distance and initial bearing, and heading-difference
//! normalization. Anything heavier (ellipsoid math, projections) belongs to
//! the consumers of this crate.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters (spherical model)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude (spherical approximation)
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_320.0;

/// Geographic center of the contiguous United States
///
/// Default reference point for offset-encoded trajectories.
pub const CONUS_CENTER: GeoPos = GeoPos {
    lat_deg: 39.8283,
    lon_deg: -98.5795,
};

/// A horizontal geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPos {
    /// Latitude in degrees
    pub lat_deg: f64,
    /// Longitude in degrees
    pub lon_deg: f64,
}

impl GeoPos {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        GeoPos { lat_deg, lon_deg }
    }
}

/// Meters per degree of longitude at the given latitude
pub fn meters_per_degree_longitude(lat_deg: f64) -> f64 {
    METERS_PER_DEGREE_LATITUDE * lat_deg.to_radians().cos()
}

/// Great-circle distance between two positions in meters (haversine)
pub fn great_circle_distance_m(a: GeoPos, b: GeoPos) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlat = (b.lat_deg - a.lat_deg).to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Initial great-circle bearing from `a` to `b` in degrees (0-360, true north)
pub fn initial_bearing_deg(a: GeoPos, b: GeoPos) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let mut bearing = y.atan2(x).to_degrees();
    if bearing < 0.0 {
        bearing += 360.0;
    }
    bearing
}

/// Signed difference `to - from` between two headings, normalized to [-180, 180]
pub fn heading_diff_deg(from_deg: f64, to_deg: f64) -> f64 {
    let mut d = (to_deg - from_deg) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}
