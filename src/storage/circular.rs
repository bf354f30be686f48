//! Circular Trace Store
//!
//! A fixed-capacity ring buffer over any encoding: once full, each append
//! overwrites the oldest retained point, so the memory footprint is exactly
//! `capacity` points no matter how many were ever appended. The store for
//! bounded live-trace displays, one per tracked object.
//!
//! All wraparound arithmetic is delegated to [`super::ring::RingIndex`].

use crate::encoding::Encoding;
use crate::error::TrajectoryError;
use crate::point::TrackPoint;
use crate::trajectory::{trace_start_index, Trajectory, TrajectoryMut};

use super::ring::RingIndex;
use super::FixedTrajectory;

/// Mutable ring-buffer trajectory retaining the newest `capacity` points
///
/// Never reallocates; `len()` saturates at `capacity()` while
/// [`Self::total_appended`] keeps advancing.
#[derive(Debug, Clone)]
pub struct TraceTrajectory<E: Encoding> {
    enc: E,
    ring: RingIndex,
}

impl<E: Encoding> TraceTrajectory<E> {
    /// Create an empty trace over `encoding`; the encoding's capacity is
    /// the fixed ring capacity
    pub fn new(encoding: E) -> Self {
        let ring = RingIndex::new(encoding.capacity());
        TraceTrajectory { enc: encoding, ring }
    }

    /// Points ever appended, including those already overwritten
    pub fn total_appended(&self) -> u64 {
        self.ring.total_appended()
    }

    /// Immutable deep copy of the retained points, oldest first
    ///
    /// The copy is laid out contiguously regardless of where the ring seam
    /// currently is.
    pub fn snapshot(&self) -> FixedTrajectory<E> {
        let (a, b) = self.ring.as_ranges();
        FixedTrajectory::copied_from_split(&self.enc, a, b)
    }

    /// Immutable copy of the maximal retained suffix spanning at most
    /// `duration_millis` from the newest point
    pub fn trace_snapshot(&self, duration_millis: i64) -> FixedTrajectory<E> {
        let start = trace_start_index(self, duration_millis);
        let (a, b) = self.ring.physical_ranges(start..self.ring.len());
        FixedTrajectory::copied_from_split(&self.enc, a, b)
    }

    /// [`Self::trace_snapshot`] with a chrono duration
    pub fn trace_snapshot_for(&self, duration: chrono::Duration) -> FixedTrajectory<E> {
        self.trace_snapshot(duration.num_milliseconds())
    }

    /// Independent trace with the same capacity, seeded with the retained
    /// points and ready to diverge
    pub fn branch(&self) -> TraceTrajectory<E> {
        let len = self.ring.len();
        let mut enc = self.enc.like(self.ring.capacity());
        let (a, b) = self.ring.as_ranges();
        let split = a.len();
        enc.copy_from(0, &self.enc, a);
        enc.copy_from(split, &self.enc, b);
        TraceTrajectory {
            enc,
            ring: RingIndex::with_len(self.ring.capacity(), len),
        }
    }
}

impl<E: Encoding> Trajectory for TraceTrajectory<E> {
    fn len(&self) -> usize {
        self.ring.len()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn get(&self, i: usize) -> Result<TrackPoint, TrajectoryError> {
        if i >= self.ring.len() {
            return Err(TrajectoryError::IndexOutOfBounds {
                index: i,
                len: self.ring.len(),
            });
        }
        Ok(self.enc.point(self.ring.physical(i)))
    }

    fn time_at(&self, i: usize) -> Result<i64, TrajectoryError> {
        if i >= self.ring.len() {
            return Err(TrajectoryError::IndexOutOfBounds {
                index: i,
                len: self.ring.len(),
            });
        }
        Ok(self.enc.time_millis(self.ring.physical(i)))
    }
}

impl<E: Encoding> TrajectoryMut for TraceTrajectory<E> {
    fn append(&mut self, p: &TrackPoint) -> Result<(), TrajectoryError> {
        let slot = self.ring.next_slot();
        self.enc
            .set(slot, p.time_millis, p.lat_deg, p.lon_deg, p.alt_m)?;
        self.ring.advance();
        Ok(())
    }

    fn clear(&mut self) {
        self.ring.clear();
        self.enc.reset();
    }

    fn drop_front(&mut self, n: usize) {
        self.ring.drop_front(n.min(self.ring.len()));
    }

    fn drop_back(&mut self, n: usize) {
        self.ring.drop_back(n.min(self.ring.len()));
    }
}
