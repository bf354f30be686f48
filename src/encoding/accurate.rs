//! Full-Precision Encoding
//!
//! Stores every scalar at its native width: `i64` epoch millis and `f64`
//! degrees/meters. No approximation, roughly 32 bytes per point. The
//! baseline the narrower encodings trade against.

use std::ops::Range;

use crate::error::TrajectoryError;
use crate::point::TrackPoint;

use super::Encoding;

/// Exact columnar encoding (8-byte scalars)
#[derive(Debug, Clone)]
pub struct AccurateEncoding {
    times: Vec<i64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    alts: Vec<f64>,
}

impl AccurateEncoding {
    /// Create an empty encoding with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        AccurateEncoding {
            times: vec![0; capacity],
            lats: vec![0.0; capacity],
            lons: vec![0.0; capacity],
            alts: vec![0.0; capacity],
        }
    }
}

impl Encoding for AccurateEncoding {
    fn like(&self, capacity: usize) -> Self {
        Self::new(capacity)
    }

    fn capacity(&self) -> usize {
        self.times.len()
    }

    fn grow(&mut self, capacity: usize) {
        self.times.resize(capacity, 0);
        self.lats.resize(capacity, 0.0);
        self.lons.resize(capacity, 0.0);
        self.alts.resize(capacity, 0.0);
    }

    fn set(
        &mut self,
        i: usize,
        time_millis: i64,
        lat_deg: f64,
        lon_deg: f64,
        alt_m: f64,
    ) -> Result<(), TrajectoryError> {
        self.times[i] = time_millis;
        self.lats[i] = lat_deg;
        self.lons[i] = lon_deg;
        self.alts[i] = alt_m;
        Ok(())
    }

    fn point(&self, i: usize) -> TrackPoint {
        TrackPoint::new(self.times[i], self.lats[i], self.lons[i], self.alts[i])
    }

    fn time_millis(&self, i: usize) -> i64 {
        self.times[i]
    }

    fn copy_from(&mut self, dst_start: usize, src: &Self, src_range: Range<usize>) {
        let n = src_range.len();
        self.times[dst_start..dst_start + n].copy_from_slice(&src.times[src_range.clone()]);
        self.lats[dst_start..dst_start + n].copy_from_slice(&src.lats[src_range.clone()]);
        self.lons[dst_start..dst_start + n].copy_from_slice(&src.lons[src_range.clone()]);
        self.alts[dst_start..dst_start + n].copy_from_slice(&src.alts[src_range]);
    }

    fn copy_within(&mut self, src_range: Range<usize>, dst: usize) {
        self.times.copy_within(src_range.clone(), dst);
        self.lats.copy_within(src_range.clone(), dst);
        self.lons.copy_within(src_range.clone(), dst);
        self.alts.copy_within(src_range, dst);
    }
}
