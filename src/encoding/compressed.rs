//! Compressed Encoding
//!
//! Densest of the three encodings: 16 bytes per point. Time and altitude are
//! stored as in the offset encoding (`i32` ms delta, `f32` meters), while
//! latitude and longitude are packed jointly into one `u64` - 32 bits per
//! axis, quantized over the full [-90, 90] / [-180, 180] ranges. Worst-case
//! rounding is about half a quantum per axis, i.e. centimeter-level. The
//! default choice for bulk trajectory history where many points must be
//! retained and moderate positional accuracy is acceptable.

use std::ops::Range;

use crate::error::TrajectoryError;
use crate::point::TrackPoint;

use super::{delta_millis, Encoding};

const LAT_SCALE: f64 = u32::MAX as f64 / 180.0;
const LON_SCALE: f64 = u32::MAX as f64 / 360.0;

/// Worst-case latitude rounding of the packed codec, in degrees (~2.3 mm)
pub const MAX_LAT_ERROR_DEG: f64 = 90.0 / u32::MAX as f64;
/// Worst-case longitude rounding of the packed codec, in degrees (~4.7 mm
/// at the equator)
pub const MAX_LON_ERROR_DEG: f64 = 180.0 / u32::MAX as f64;

/// Pack a lat/lon pair into one 64-bit word (32 quantized bits per axis)
///
/// Inputs outside the canonical ranges are clamped.
pub fn pack_latlon(lat_deg: f64, lon_deg: f64) -> u64 {
    let qlat = ((lat_deg + 90.0) * LAT_SCALE)
        .round()
        .clamp(0.0, u32::MAX as f64) as u64;
    let qlon = ((lon_deg + 180.0) * LON_SCALE)
        .round()
        .clamp(0.0, u32::MAX as f64) as u64;
    (qlat << 32) | qlon
}

/// Inverse of [`pack_latlon`]
pub fn unpack_latlon(packed: u64) -> (f64, f64) {
    let qlat = (packed >> 32) as f64;
    let qlon = (packed & 0xFFFF_FFFF) as f64;
    (qlat / LAT_SCALE - 90.0, qlon / LON_SCALE - 180.0)
}

/// Delta time/altitude encoding with jointly packed lat/lon
#[derive(Debug, Clone)]
pub struct CompressedEncoding {
    t0_millis: Option<i64>,
    dts: Vec<i32>,
    latlons: Vec<u64>,
    alts: Vec<f32>,
}

impl CompressedEncoding {
    /// Create an empty encoding with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        CompressedEncoding {
            t0_millis: None,
            dts: vec![0; capacity],
            latlons: vec![0; capacity],
            alts: vec![0.0; capacity],
        }
    }

    /// Base time captured at the first `set`, if any
    pub fn base_time_millis(&self) -> Option<i64> {
        self.t0_millis
    }
}

impl Encoding for CompressedEncoding {
    fn like(&self, capacity: usize) -> Self {
        let mut e = Self::new(capacity);
        // carry the base time so raw copies from self decode identically
        e.t0_millis = self.t0_millis;
        e
    }

    fn capacity(&self) -> usize {
        self.dts.len()
    }

    fn grow(&mut self, capacity: usize) {
        self.dts.resize(capacity, 0);
        self.latlons.resize(capacity, 0);
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
        self.latlons[i] = pack_latlon(lat_deg, lon_deg);
        self.alts[i] = alt_m as f32;
        Ok(())
    }

    fn point(&self, i: usize) -> TrackPoint {
        let (lat_deg, lon_deg) = unpack_latlon(self.latlons[i]);
        TrackPoint::new(self.time_millis(i), lat_deg, lon_deg, self.alts[i] as f64)
    }

    fn time_millis(&self, i: usize) -> i64 {
        self.t0_millis.unwrap_or(0) + self.dts[i] as i64
    }

    fn copy_from(&mut self, dst_start: usize, src: &Self, src_range: Range<usize>) {
        let n = src_range.len();
        self.dts[dst_start..dst_start + n].copy_from_slice(&src.dts[src_range.clone()]);
        self.latlons[dst_start..dst_start + n].copy_from_slice(&src.latlons[src_range.clone()]);
        self.alts[dst_start..dst_start + n].copy_from_slice(&src.alts[src_range]);
    }

    fn copy_within(&mut self, src_range: Range<usize>, dst: usize) {
        self.dts.copy_within(src_range.clone(), dst);
        self.latlons.copy_within(src_range.clone(), dst);
        self.alts.copy_within(src_range, dst);
    }

    fn reset(&mut self) {
        self.t0_millis = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::MAX_TIME_DELTA_MILLIS;

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn test_pack_unpack_within_quantum() {
        let cases = [
            (0.0, 0.0),
            (37.615223, -122.389977),
            (-33.9461, 151.1772),
            (89.9999, 179.9999),
            (-89.9999, -179.9999),
        ];
        for (lat, lon) in cases {
            let (ulat, ulon) = unpack_latlon(pack_latlon(lat, lon));
            assert!((ulat - lat).abs() <= MAX_LAT_ERROR_DEG, "lat {lat}");
            assert!((ulon - lon).abs() <= MAX_LON_ERROR_DEG, "lon {lon}");
        }
    }

    #[test]
    fn test_pack_extremes() {
        let (lat, lon) = unpack_latlon(pack_latlon(90.0, 180.0));
        assert!((lat - 90.0).abs() <= MAX_LAT_ERROR_DEG);
        assert!((lon - 180.0).abs() <= MAX_LON_ERROR_DEG);

        let (lat, lon) = unpack_latlon(pack_latlon(-90.0, -180.0));
        assert!((lat + 90.0).abs() <= MAX_LAT_ERROR_DEG);
        assert!((lon + 180.0).abs() <= MAX_LON_ERROR_DEG);
    }

    #[test]
    fn test_roundtrip() {
        let mut enc = CompressedEncoding::new(2);
        enc.set(0, T0, 37.6152, -122.3899, 3047.9).unwrap();
        enc.set(1, T0 + 60_000, 37.6170, -122.3850, 3100.2).unwrap();

        let p = enc.point(1);
        assert_eq!(p.time_millis, T0 + 60_000);
        assert!((p.lat_deg - 37.6170).abs() <= MAX_LAT_ERROR_DEG);
        assert!((p.lon_deg - (-122.3850)).abs() <= MAX_LON_ERROR_DEG);
        assert!((p.alt_m - 3100.2).abs() < 0.01);
    }

    #[test]
    fn test_time_window_enforced() {
        let mut enc = CompressedEncoding::new(2);
        enc.set(0, T0, 0.0, 0.0, 0.0).unwrap();
        assert!(enc.set(1, T0 + MAX_TIME_DELTA_MILLIS + 1, 0.0, 0.0, 0.0).is_err());
    }
}
