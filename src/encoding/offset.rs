//! Offset Encoding
//!
//! Stores each point as 32-bit deltas from a fixed geographic reference
//! point and from the time of the first appended point (captured lazily).
//! Halves the per-point footprint of the accurate encoding at sub-meter
//! positional error near the reference - the preferred encoding for
//! high-point-count, geographically localized traces.
//!
//! The delta-time field is an `i32` in milliseconds, so a single encoding
//! instance covers at most [`super::MAX_TIME_DELTA_MILLIS`] (~24.85 days)
//! from its base time; appends beyond that fail instead of wrapping.
//! Long-lived ring traces that must outlast the window should use the
//! accurate encoding.

use std::ops::Range;

use crate::error::TrajectoryError;
use crate::geo::{GeoPos, CONUS_CENTER};
use crate::point::TrackPoint;

use super::{delta_millis, Encoding};

/// 32-bit delta encoding relative to a fixed reference position
///
/// Altitude is stored as a plain `f32` (delta from zero), which keeps
/// centimeter resolution for any altitude an aircraft reaches.
#[derive(Debug, Clone)]
pub struct OffsetEncoding {
    reference: GeoPos,
    t0_millis: Option<i64>,
    dts: Vec<i32>,
    dlats: Vec<f32>,
    dlons: Vec<f32>,
    alts: Vec<f32>,
}

impl OffsetEncoding {
    /// Create an empty encoding referenced to the geographic center of the
    /// contiguous US ([`CONUS_CENTER`])
    pub fn new(capacity: usize) -> Self {
        Self::with_reference(CONUS_CENTER, capacity)
    }

    /// Create an empty encoding with an explicit reference position
    ///
    /// Pick a reference close to the expected trace area; the f32 delta
    /// error grows with distance from it.
    pub fn with_reference(reference: GeoPos, capacity: usize) -> Self {
        OffsetEncoding {
            reference,
            t0_millis: None,
            dts: vec![0; capacity],
            dlats: vec![0.0; capacity],
            dlons: vec![0.0; capacity],
            alts: vec![0.0; capacity],
        }
    }

    /// The fixed reference position all stored deltas are relative to
    pub fn reference(&self) -> GeoPos {
        self.reference
    }

    /// Base time captured at the first `set`, if any
    pub fn base_time_millis(&self) -> Option<i64> {
        self.t0_millis
    }
}

impl Encoding for OffsetEncoding {
    fn like(&self, capacity: usize) -> Self {
        let mut e = Self::with_reference(self.reference, capacity);
        // carry the base time so raw copies from self decode identically
        e.t0_millis = self.t0_millis;
        e
    }

    fn capacity(&self) -> usize {
        self.dts.len()
    }

    fn grow(&mut self, capacity: usize) {
        self.dts.resize(capacity, 0);
        self.dlats.resize(capacity, 0.0);
        self.dlons.resize(capacity, 0.0);
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
        let t0 = *self.t0_millis.get_or_insert(time_millis);
        let dt = delta_millis(t0, time_millis)?;

        self.dts[i] = dt;
        self.dlats[i] = (lat_deg - self.reference.lat_deg) as f32;
        self.dlons[i] = (lon_deg - self.reference.lon_deg) as f32;
        self.alts[i] = alt_m as f32;
        Ok(())
    }

    fn point(&self, i: usize) -> TrackPoint {
        TrackPoint::new(
            self.time_millis(i),
            self.reference.lat_deg + self.dlats[i] as f64,
            self.reference.lon_deg + self.dlons[i] as f64,
            self.alts[i] as f64,
        )
    }

    fn time_millis(&self, i: usize) -> i64 {
        self.t0_millis.unwrap_or(0) + self.dts[i] as i64
    }

    fn copy_from(&mut self, dst_start: usize, src: &Self, src_range: Range<usize>) {
        let n = src_range.len();
        self.dts[dst_start..dst_start + n].copy_from_slice(&src.dts[src_range.clone()]);
        self.dlats[dst_start..dst_start + n].copy_from_slice(&src.dlats[src_range.clone()]);
        self.dlons[dst_start..dst_start + n].copy_from_slice(&src.dlons[src_range.clone()]);
        self.alts[dst_start..dst_start + n].copy_from_slice(&src.alts[src_range]);
    }

    fn copy_within(&mut self, src_range: Range<usize>, dst: usize) {
        self.dts.copy_within(src_range.clone(), dst);
        self.dlats.copy_within(src_range.clone(), dst);
        self.dlons.copy_within(src_range.clone(), dst);
        self.alts.copy_within(src_range, dst);
    }

    fn reset(&mut self) {
        self.t0_millis = None;
    }
}
