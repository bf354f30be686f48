//! Fixed (Immutable) Trajectory Store
//!
//! Backing arrays are allocated exactly once, `len == capacity`, and no
//! mutating interface exists. Produced by the snapshot operations of the
//! mutable stores; safe to share across threads as a finished value.

use std::ops::Range;

use crate::encoding::Encoding;
use crate::error::TrajectoryError;
use crate::point::TrackPoint;
use crate::trajectory::{trace_start_index, Trajectory};

use super::GrowableTrajectory;

/// Immutable trajectory with `len == capacity`
#[derive(Debug, Clone)]
pub struct FixedTrajectory<E: Encoding> {
    enc: E,
    len: usize,
}

impl<E: Encoding> FixedTrajectory<E> {
    /// Deep-copy the slots `range` of `enc` into an exactly-sized store
    pub(crate) fn copied_from(enc: &E, range: Range<usize>) -> Self {
        Self::copied_from_split(enc, range, 0..0)
    }

    /// Deep-copy two physical ranges (a wrapped ring) in order
    pub(crate) fn copied_from_split(enc: &E, a: Range<usize>, b: Range<usize>) -> Self {
        let len = a.len() + b.len();
        let mut dst = enc.like(len);
        let split = a.len();
        dst.copy_from(0, enc, a);
        dst.copy_from(split, enc, b);
        FixedTrajectory { enc: dst, len }
    }

    /// Snapshot of an immutable trajectory: an equal, independent copy
    ///
    /// Immutable trajectories are snapshot-stable; this is a plain deep
    /// copy with identical contents.
    pub fn snapshot(&self) -> FixedTrajectory<E> {
        self.clone()
    }

    /// Immutable copy of the maximal suffix spanning at most
    /// `duration_millis` from the newest point
    pub fn trace_snapshot(&self, duration_millis: i64) -> FixedTrajectory<E> {
        let start = trace_start_index(self, duration_millis);
        Self::copied_from(&self.enc, start..self.len)
    }

    /// [`Self::trace_snapshot`] with a chrono duration
    pub fn trace_snapshot_for(&self, duration: chrono::Duration) -> FixedTrajectory<E> {
        self.trace_snapshot(duration.num_milliseconds())
    }

    /// Independent mutable trajectory seeded with this one's contents
    pub fn branch(&self) -> GrowableTrajectory<E> {
        let mut enc = self.enc.like(self.len);
        enc.copy_from(0, &self.enc, 0..self.len);
        GrowableTrajectory::from_parts(enc, self.len)
    }
}

impl<E: Encoding> Trajectory for FixedTrajectory<E> {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.len
    }

    fn get(&self, i: usize) -> Result<TrackPoint, TrajectoryError> {
        if i >= self.len {
            return Err(TrajectoryError::IndexOutOfBounds { index: i, len: self.len });
        }
        Ok(self.enc.point(i))
    }

    fn time_at(&self, i: usize) -> Result<i64, TrajectoryError> {
        if i >= self.len {
            return Err(TrajectoryError::IndexOutOfBounds { index: i, len: self.len });
        }
        Ok(self.enc.time_millis(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::AccurateEncoding;
    use crate::trajectory::TrajectoryMut;

    fn fixed_track() -> FixedTrajectory<AccurateEncoding> {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(4));
        for i in 0..4i64 {
            t.append_values(i * 30_000, 39.0 + 0.01 * i as f64, -98.0, 5000.0).unwrap();
        }
        t.snapshot()
    }

    #[test]
    fn test_size_equals_capacity() {
        let t = fixed_track();
        assert_eq!(t.len(), 4);
        assert_eq!(t.capacity(), 4);
    }

    #[test]
    fn test_bounds_error() {
        let t = fixed_track();
        assert!(t.get(3).is_ok());
        assert_eq!(
            t.get(4).unwrap_err(),
            TrajectoryError::IndexOutOfBounds { index: 4, len: 4 }
        );
    }

    #[test]
    fn test_snapshot_of_snapshot_is_equal() {
        let t = fixed_track();
        let s = t.snapshot();
        assert_eq!(s.len(), t.len());
        for i in 0..t.len() {
            assert_eq!(s.get(i).unwrap(), t.get(i).unwrap());
        }
    }

    #[test]
    fn test_branch_diverges_independently() {
        let t = fixed_track();
        let mut b = t.branch();
        b.append_values(200_000, 40.0, -98.0, 5000.0).unwrap();

        assert_eq!(t.len(), 4);
        assert_eq!(b.len(), 5);
        assert_eq!(b.get(0).unwrap(), t.get(0).unwrap());
    }

    #[test]
    fn test_trace_snapshot_suffix() {
        let t = fixed_track(); // 30s steps, 90s span
        let s = t.trace_snapshot(30_000);
        assert_eq!(s.len(), 2);
        assert_eq!(s.first_time(), Some(60_000));
        assert_eq!(s.last_time(), Some(90_000));
    }
}
