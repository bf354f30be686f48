//! Trajectory Point Encodings
//!
//! An encoding decides how a sequence of `(time, lat, lon, alt)` samples is
//! laid out in memory. Three interchangeable strategies are provided:
//!
//! - **accurate**: full-precision 8-byte scalars, exact
//! - **offset**: 32-bit deltas from a fixed geographic reference and a lazily
//!   captured base time
//! - **compressed**: delta time and altitude plus a packed lat/lon codec
//!
//! Storage backends (`crate::storage`) are generic over an [`Encoding`], so
//! every (encoding x backend) pair shares one implementation of the facade.

mod accurate;
mod compressed;
mod offset;

pub use accurate::AccurateEncoding;
pub use compressed::{
    pack_latlon, unpack_latlon, CompressedEncoding, MAX_LAT_ERROR_DEG, MAX_LON_ERROR_DEG,
};
pub use offset::OffsetEncoding;

use std::ops::Range;

use crate::error::TrajectoryError;
use crate::point::TrackPoint;

/// Upper bound of the 32-bit millisecond delta used by the offset and
/// compressed encodings: `i32::MAX` ms, about 24.85 days.
///
/// Appends whose delta from the base time falls outside `0..=MAX` fail with
/// [`TrajectoryError::TimeRangeExceeded`] instead of silently truncating.
pub const MAX_TIME_DELTA_MILLIS: i64 = i32::MAX as i64;

/// Columnar point storage with a fixed slot count
///
/// Implementations own parallel arrays of `capacity` slots; the logical
/// length and slot assignment are the storage backend's business. All raw
/// copies (`copy_from`, `copy_within`) move encoded columns verbatim, so
/// they are exact - but `copy_from` is only meaningful between encodings
/// that share reference configuration, which [`Encoding::like`] guarantees.
pub trait Encoding: Clone {
    /// Create an empty encoding with the given capacity and the same
    /// reference configuration (geographic reference, base time) as `self`,
    /// so raw copies from `self` decode identically.
    fn like(&self, capacity: usize) -> Self;

    /// Number of allocated slots
    fn capacity(&self) -> usize;

    /// Reallocate to `capacity` slots, preserving existing contents
    fn grow(&mut self, capacity: usize);

    /// Encode one sample into slot `i`
    ///
    /// Slot `i` must be within capacity. Fails with `TimeRangeExceeded` when
    /// the encoding cannot represent the time value.
    fn set(
        &mut self,
        i: usize,
        time_millis: i64,
        lat_deg: f64,
        lon_deg: f64,
        alt_m: f64,
    ) -> Result<(), TrajectoryError>;

    /// Decode slot `i` into a track point
    fn point(&self, i: usize) -> TrackPoint;

    /// Decode slot `i` into a caller-supplied buffer
    fn read_into(&self, i: usize, p: &mut TrackPoint) {
        *p = self.point(i);
    }

    /// Decode only the timestamp of slot `i`
    fn time_millis(&self, i: usize) -> i64;

    /// Raw-copy encoded slots `src_range` of `src` to `dst_start..`
    fn copy_from(&mut self, dst_start: usize, src: &Self, src_range: Range<usize>);

    /// Raw-copy encoded slots `src_range` to `dst..` within `self`
    ///
    /// Ranges may overlap (memmove semantics).
    fn copy_within(&mut self, src_range: Range<usize>, dst: usize);

    /// Forget any lazily captured base time, so the next `set` starts a
    /// fresh delta epoch. No-op for encodings without a base time.
    fn reset(&mut self) {}
}

/// Validated conversion of an absolute time to a 32-bit delta from `t0`
pub(crate) fn delta_millis(t0_millis: i64, time_millis: i64) -> Result<i32, TrajectoryError> {
    let delta = time_millis - t0_millis;
    if !(0..=MAX_TIME_DELTA_MILLIS).contains(&delta) {
        return Err(TrajectoryError::TimeRangeExceeded {
            delta_millis: delta,
            max_millis: MAX_TIME_DELTA_MILLIS,
        });
    }
    Ok(delta as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_bounds() {
        assert_eq!(delta_millis(1000, 1000), Ok(0));
        assert_eq!(delta_millis(1000, 1000 + MAX_TIME_DELTA_MILLIS), Ok(i32::MAX));

        assert_eq!(
            delta_millis(1000, 999),
            Err(TrajectoryError::TimeRangeExceeded {
                delta_millis: -1,
                max_millis: MAX_TIME_DELTA_MILLIS
            })
        );
        assert_eq!(
            delta_millis(0, MAX_TIME_DELTA_MILLIS + 1),
            Err(TrajectoryError::TimeRangeExceeded {
                delta_millis: MAX_TIME_DELTA_MILLIS + 1,
                max_millis: MAX_TIME_DELTA_MILLIS
            })
        );
    }
}
