//! Track Point Value Type
//!
//! The universal exchange record for moving a single sample in or out of any
//! trajectory, independent of the trajectory's internal encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPos;

/// A single timestamped 3D geographic position
///
/// `TrackPoint` is `Copy`, so iteration and bulk processing hand out values
/// without allocating. Call sites that want explicit buffer reuse can go
/// through [`crate::trajectory::Trajectory::get_into`] instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    /// Unix timestamp in milliseconds
    pub time_millis: i64,
    /// Latitude in degrees
    pub lat_deg: f64,
    /// Longitude in degrees
    pub lon_deg: f64,
    /// Altitude in meters
    pub alt_m: f64,
}

impl TrackPoint {
    /// Create a new track point from raw scalars
    pub fn new(time_millis: i64, lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        TrackPoint {
            time_millis,
            lat_deg,
            lon_deg,
            alt_m,
        }
    }

    /// Create a track point from a UTC time point
    pub fn at(time: DateTime<Utc>, lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self::new(time.timestamp_millis(), lat_deg, lon_deg, alt_m)
    }

    /// Timestamp as a UTC time point
    ///
    /// `None` only for timestamps outside chrono's representable range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.time_millis)
    }

    /// Horizontal position of this point
    pub fn pos(&self) -> GeoPos {
        GeoPos::new(self.lat_deg, self.lon_deg)
    }
}
