//! Trajectory Facade
//!
//! The read and write interfaces implemented by every (encoding x backend)
//! pair: bounds-checked random access, forward/backward iteration, columnar
//! export, time queries and the time-window scan behind `trace_snapshot`.
//!
//! Trajectories are single-writer: mutation is not synchronized and must be
//! externally serialized (one instance per tracked object is the intended
//! pattern). Immutable snapshots can be read from any number of threads.

use crate::error::TrajectoryError;
use crate::point::TrackPoint;

/// Read access to an ordered, time-increasing sequence of track points
///
/// Logical indices run `0..len()`, oldest first. Stores never reorder
/// points; append ordering is the writer's responsibility (see
/// [`crate::filter::MinIntervalFilter`] for an append-time gatekeeper).
pub trait Trajectory {
    /// Number of stored points
    fn len(&self) -> usize;

    /// Number of allocated point slots (`>= len()`)
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The point at logical index `i`, oldest first
    fn get(&self, i: usize) -> Result<TrackPoint, TrajectoryError>;

    /// Decode the point at `i` into a caller-supplied buffer
    fn get_into(&self, i: usize, p: &mut TrackPoint) -> Result<(), TrajectoryError> {
        *p = self.get(i)?;
        Ok(())
    }

    /// Timestamp of the point at logical index `i`
    fn time_at(&self, i: usize) -> Result<i64, TrajectoryError>;

    /// Timestamp of the oldest point, `None` if empty
    fn first_time(&self) -> Option<i64> {
        if self.is_empty() {
            None
        } else {
            self.time_at(0).ok()
        }
    }

    /// Timestamp of the newest point, `None` if empty
    fn last_time(&self) -> Option<i64> {
        if self.is_empty() {
            None
        } else {
            self.time_at(self.len() - 1).ok()
        }
    }

    /// Covered time span in milliseconds, `None` if empty
    fn duration_millis(&self) -> Option<i64> {
        Some(self.last_time()? - self.first_time()?)
    }

    /// Index of the last point with `time <= time_millis`
    ///
    /// `None` if `time_millis` precedes the first point; `len()-1` if it is
    /// at or after the last. Binary search over the increasing timestamps.
    fn index_before(&self, time_millis: i64) -> Option<usize> {
        let n = self.len();
        if n == 0 || time_millis < self.time_at(0).ok()? {
            return None;
        }
        let mut lo = 0;
        let mut hi = n - 1;
        while lo < hi {
            let mid = (lo + hi + 1) / 2;
            if self.time_at(mid).ok()? <= time_millis {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Some(lo)
    }

    /// Bulk columnar export in forward logical order
    ///
    /// Fails with `ShortExportSlice` if any slice holds fewer than `len()`
    /// elements; longer slices keep their tail untouched.
    fn copy_to_arrays(
        &self,
        times: &mut [i64],
        lats: &mut [f64],
        lons: &mut [f64],
        alts: &mut [f64],
    ) -> Result<(), TrajectoryError> {
        let n = self.len();
        let got = times.len().min(lats.len()).min(lons.len()).min(alts.len());
        if got < n {
            return Err(TrajectoryError::ShortExportSlice { needed: n, got });
        }
        for i in 0..n {
            let p = self.get(i)?;
            times[i] = p.time_millis;
            lats[i] = p.lat_deg;
            lons[i] = p.lon_deg;
            alts[i] = p.alt_m;
        }
        Ok(())
    }

    /// Forward iteration over the stored points, oldest first
    ///
    /// Lazy and restartable; each call starts a fresh pass.
    fn iter(&self) -> TrajectoryIter<'_, Self>
    where
        Self: Sized,
    {
        TrajectoryIter {
            traj: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Backward iteration, newest first
    fn iter_rev(&self) -> std::iter::Rev<TrajectoryIter<'_, Self>>
    where
        Self: Sized,
    {
        self.iter().rev()
    }
}

/// Write access for mutable trajectories
pub trait TrajectoryMut: Trajectory {
    /// Append one point
    ///
    /// Fails only when the underlying encoding cannot represent the time
    /// value; out-of-order appends are not rejected here.
    fn append(&mut self, p: &TrackPoint) -> Result<(), TrajectoryError>;

    /// Append one point from raw scalars
    fn append_values(
        &mut self,
        time_millis: i64,
        lat_deg: f64,
        lon_deg: f64,
        alt_m: f64,
    ) -> Result<(), TrajectoryError> {
        self.append(&TrackPoint::new(time_millis, lat_deg, lon_deg, alt_m))
    }

    /// Remove all points
    fn clear(&mut self);

    /// Discard the `n` oldest points (all of them if `n >= len()`)
    fn drop_front(&mut self, n: usize);

    /// Discard the `n` newest points (all of them if `n >= len()`)
    fn drop_back(&mut self, n: usize);
}

/// Double-ended iterator over a trajectory's points
///
/// Yields `TrackPoint` by value; the point type is `Copy`, so iteration
/// performs no allocation.
pub struct TrajectoryIter<'a, T: Trajectory> {
    traj: &'a T,
    front: usize,
    back: usize,
}

impl<T: Trajectory> Iterator for TrajectoryIter<'_, T> {
    type Item = TrackPoint;

    fn next(&mut self) -> Option<TrackPoint> {
        if self.front >= self.back {
            return None;
        }
        let p = self.traj.get(self.front).ok()?;
        self.front += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T: Trajectory> DoubleEndedIterator for TrajectoryIter<'_, T> {
    fn next_back(&mut self) -> Option<TrackPoint> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.traj.get(self.back).ok()
    }
}

impl<T: Trajectory> ExactSizeIterator for TrajectoryIter<'_, T> {}

/// First logical index of the maximal suffix spanning at most
/// `duration_millis` from the newest point
///
/// Scans backward from the newest point; returns 0 (the whole trajectory)
/// when the total span already fits the window.
pub(crate) fn trace_start_index<T: Trajectory + ?Sized>(traj: &T, duration_millis: i64) -> usize {
    let n = traj.len();
    if n == 0 {
        return 0;
    }
    let last = match traj.time_at(n - 1) {
        Ok(t) => t,
        Err(_) => return 0,
    };
    let mut start = n - 1;
    while start > 0 {
        match traj.time_at(start - 1) {
            Ok(t) if last - t <= duration_millis => start -= 1,
            _ => break,
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::AccurateEncoding;
    use crate::storage::GrowableTrajectory;

    fn climb_track() -> GrowableTrajectory<AccurateEncoding> {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(4));
        for i in 0..5i64 {
            t.append_values(i * 60_000, 0.001 * i as f64, -98.0, 1000.0 + 100.0 * i as f64)
                .unwrap();
        }
        t
    }

    #[test]
    fn test_forward_and_reverse_iteration() {
        let t = climb_track();

        let times: Vec<i64> = t.iter().map(|p| p.time_millis).collect();
        assert_eq!(times, vec![0, 60_000, 120_000, 180_000, 240_000]);

        let rev: Vec<i64> = t.iter_rev().map(|p| p.time_millis).collect();
        assert_eq!(rev, vec![240_000, 180_000, 120_000, 60_000, 0]);

        // restartable: a second pass sees the same sequence
        assert_eq!(t.iter().count(), 5);
        assert_eq!(t.iter().count(), 5);
    }

    #[test]
    fn test_index_before() {
        let t = climb_track();

        assert_eq!(t.index_before(-1), None);
        assert_eq!(t.index_before(0), Some(0));
        assert_eq!(t.index_before(59_999), Some(0));
        assert_eq!(t.index_before(60_000), Some(1));
        assert_eq!(t.index_before(100_000), Some(1));
        assert_eq!(t.index_before(240_000), Some(4));
        assert_eq!(t.index_before(i64::MAX), Some(4));
    }

    #[test]
    fn test_empty_time_queries() {
        let t = GrowableTrajectory::new(AccurateEncoding::new(2));
        assert!(t.is_empty());
        assert_eq!(t.first_time(), None);
        assert_eq!(t.last_time(), None);
        assert_eq!(t.duration_millis(), None);
        assert_eq!(t.index_before(0), None);
    }

    #[test]
    fn test_copy_to_arrays_rejects_short_slice() {
        let t = climb_track();
        let mut times = [0i64; 4]; // one short
        let mut lats = [0.0; 5];
        let mut lons = [0.0; 5];
        let mut alts = [0.0; 5];

        let err = t
            .copy_to_arrays(&mut times, &mut lats, &mut lons, &mut alts)
            .unwrap_err();
        assert_eq!(err, TrajectoryError::ShortExportSlice { needed: 5, got: 4 });
    }

    #[test]
    fn test_trace_start_index_window() {
        let t = climb_track(); // spans 240s in 60s steps

        assert_eq!(trace_start_index(&t, 0), 4);
        assert_eq!(trace_start_index(&t, 59_999), 4);
        assert_eq!(trace_start_index(&t, 60_000), 3);
        assert_eq!(trace_start_index(&t, 120_000), 2);
        assert_eq!(trace_start_index(&t, 240_000), 0);
        assert_eq!(trace_start_index(&t, i64::MAX), 0);
    }
}
