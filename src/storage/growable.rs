//! Growable Trajectory Store
//!
//! Classic amortized array growth: capacity doubles whenever an append
//! exceeds it, so `append` is O(1) amortized. The default store for
//! unbounded track recording.

use log::debug;

use crate::encoding::Encoding;
use crate::error::TrajectoryError;
use crate::point::TrackPoint;
use crate::trajectory::{trace_start_index, Trajectory, TrajectoryMut};

use super::FixedTrajectory;

/// Mutable trajectory with amortized-doubling capacity
///
/// Constructed from a pre-sized encoding carrying the initial capacity:
///
/// ```
/// use geotraj::{GrowableTrajectory, AccurateEncoding, TrajectoryMut, Trajectory};
///
/// let mut t = GrowableTrajectory::new(AccurateEncoding::new(16));
/// t.append_values(0, 39.8, -98.6, 1000.0).unwrap();
/// assert_eq!(t.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GrowableTrajectory<E: Encoding> {
    enc: E,
    len: usize,
}

impl<E: Encoding> GrowableTrajectory<E> {
    /// Create an empty trajectory over `encoding`, whose capacity is the
    /// initial capacity hint
    pub fn new(encoding: E) -> Self {
        GrowableTrajectory { enc: encoding, len: 0 }
    }

    pub(crate) fn from_parts(enc: E, len: usize) -> Self {
        GrowableTrajectory { enc, len }
    }

    /// Double capacity until `needed` fits
    ///
    /// Overflowing the representable capacity is fatal; there is nothing
    /// sensible to retry.
    fn ensure_capacity(&mut self, needed: usize) {
        let cap = self.enc.capacity();
        if needed <= cap {
            return;
        }
        let mut new_cap = cap.max(1);
        while new_cap < needed {
            new_cap = match new_cap.checked_mul(2) {
                Some(c) => c,
                None => panic!("trajectory capacity overflow past {new_cap} points"),
            };
        }
        debug!("growing trajectory storage {} -> {} points", cap, new_cap);
        self.enc.grow(new_cap);
    }

    /// Immutable deep copy of the current contents
    pub fn snapshot(&self) -> FixedTrajectory<E> {
        FixedTrajectory::copied_from(&self.enc, 0..self.len)
    }

    /// Immutable copy of the maximal suffix spanning at most
    /// `duration_millis` from the newest point
    pub fn trace_snapshot(&self, duration_millis: i64) -> FixedTrajectory<E> {
        let start = trace_start_index(self, duration_millis);
        FixedTrajectory::copied_from(&self.enc, start..self.len)
    }

    /// [`Self::trace_snapshot`] with a chrono duration
    pub fn trace_snapshot_for(&self, duration: chrono::Duration) -> FixedTrajectory<E> {
        self.trace_snapshot(duration.num_milliseconds())
    }

    /// Independent mutable trajectory seeded with this one's contents
    pub fn branch(&self) -> GrowableTrajectory<E> {
        self.clone()
    }
}

impl<E: Encoding> Trajectory for GrowableTrajectory<E> {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.enc.capacity()
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

impl<E: Encoding> TrajectoryMut for GrowableTrajectory<E> {
    fn append(&mut self, p: &TrackPoint) -> Result<(), TrajectoryError> {
        self.ensure_capacity(self.len + 1);
        self.enc
            .set(self.len, p.time_millis, p.lat_deg, p.lon_deg, p.alt_m)?;
        self.len += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.len = 0;
        self.enc.reset();
    }

    fn drop_front(&mut self, n: usize) {
        let n = n.min(self.len);
        self.enc.copy_within(n..self.len, 0);
        self.len -= n;
    }

    fn drop_back(&mut self, n: usize) {
        self.len -= n.min(self.len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{AccurateEncoding, OffsetEncoding};

    #[test]
    fn test_growth_scenario() {
        // capacity 2, three appends: grows to 4, contents intact
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(2));
        t.append_values(0, 0.0, 0.0, 1000.0).unwrap();
        t.append_values(60_000, 0.001, 0.0, 1000.0).unwrap();
        t.append_values(120_000, 0.002, 0.0, 1000.0).unwrap();

        assert_eq!(t.len(), 3);
        assert!(t.capacity() >= 3);
        assert_eq!(t.capacity(), 4); // doubled once
        assert!((t.get(1).unwrap().lat_deg - 0.001).abs() < 1e-12);

        let s = t.trace_snapshot(60_000);
        assert_eq!(s.len(), 2);
        assert_eq!(s.first_time(), Some(60_000));
        assert_eq!(s.last_time(), Some(120_000));
    }

    #[test]
    fn test_capacity_invariant_over_many_appends() {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(1));
        let mut prev_cap = t.capacity();
        for i in 0..100i64 {
            t.append_values(i * 1000, 0.0, 0.0, 0.0).unwrap();
            assert!(t.capacity() >= t.len());
            if t.capacity() != prev_cap {
                assert_eq!(t.capacity(), prev_cap * 2); // geometric growth
                prev_cap = t.capacity();
            }
        }
        assert_eq!(t.len(), 100);
    }

    #[test]
    fn test_snapshot_independence() {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(4));
        t.append_values(0, 10.0, 20.0, 30.0).unwrap();
        t.append_values(1000, 11.0, 21.0, 31.0).unwrap();

        let s = t.snapshot();
        t.append_values(2000, 12.0, 22.0, 32.0).unwrap();
        t.drop_front(1);

        assert_eq!(s.len(), 2);
        assert_eq!(s.get(0).unwrap().lat_deg, 10.0);
        assert_eq!(s.get(1).unwrap().lat_deg, 11.0);
    }

    #[test]
    fn test_drop_front_and_back() {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(8));
        for i in 0..6i64 {
            t.append_values(i * 1000, i as f64, 0.0, 0.0).unwrap();
        }

        t.drop_front(2);
        assert_eq!(t.len(), 4);
        assert_eq!(t.first_time(), Some(2000));

        t.drop_back(1);
        assert_eq!(t.len(), 3);
        assert_eq!(t.last_time(), Some(4000));

        t.drop_front(100); // over-drop empties
        assert!(t.is_empty());
    }

    #[test]
    fn test_clear_resets_offset_epoch() {
        let mut t = GrowableTrajectory::new(OffsetEncoding::new(4));
        t.append_values(1_700_000_000_000, 39.8, -98.6, 100.0).unwrap();
        t.clear();
        assert!(t.is_empty());

        // far later epoch is accepted after clear
        t.append_values(1_710_000_000_000, 39.8, -98.6, 100.0).unwrap();
        assert_eq!(t.first_time(), Some(1_710_000_000_000));
    }

    #[test]
    fn test_offset_snapshot_decodes_identically() {
        let mut t = GrowableTrajectory::new(OffsetEncoding::new(2));
        t.append_values(1_700_000_000_000, 39.5, -98.2, 1500.0).unwrap();
        t.append_values(1_700_000_060_000, 39.6, -98.3, 1600.0).unwrap();

        let s = t.snapshot();
        for i in 0..t.len() {
            assert_eq!(s.get(i).unwrap(), t.get(i).unwrap());
        }
    }
}
