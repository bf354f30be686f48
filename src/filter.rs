//! Append-Time Filtering
//!
//! A gatekeeper wrapping a mutable trajectory and applying a policy before
//! forwarding each append. The one concrete policy: a minimum inter-point
//! interval, used to thin high-rate position feeds before storage.

use log::trace;

use crate::error::TrajectoryError;
use crate::point::TrackPoint;
use crate::trajectory::TrajectoryMut;

/// Forwards appends only when at least `min_interval_millis` has passed
/// since the last forwarded point
///
/// Points arriving too early are silently dropped (`Ok(false)`), not an
/// error. The filter also rejects out-of-order times, since those never
/// satisfy the interval.
#[derive(Debug, Clone)]
pub struct MinIntervalFilter<T: TrajectoryMut> {
    inner: T,
    min_interval_millis: i64,
    last_forwarded_millis: Option<i64>,
}

impl<T: TrajectoryMut> MinIntervalFilter<T> {
    pub fn new(inner: T, min_interval_millis: i64) -> Self {
        MinIntervalFilter {
            inner,
            min_interval_millis,
            last_forwarded_millis: None,
        }
    }

    /// Append `p` if the interval policy allows it
    ///
    /// Returns `Ok(true)` when the point was forwarded, `Ok(false)` when it
    /// was dropped; errors only come from the wrapped trajectory.
    pub fn append(&mut self, p: &TrackPoint) -> Result<bool, TrajectoryError> {
        if let Some(last) = self.last_forwarded_millis {
            if p.time_millis - last < self.min_interval_millis {
                trace!(
                    "dropping point at {} ms, only {} ms since last forwarded",
                    p.time_millis,
                    p.time_millis - last
                );
                return Ok(false);
            }
        }
        self.inner.append(p)?;
        self.last_forwarded_millis = Some(p.time_millis);
        Ok(true)
    }

    /// Append from raw scalars, same policy as [`Self::append`]
    pub fn append_values(
        &mut self,
        time_millis: i64,
        lat_deg: f64,
        lon_deg: f64,
        alt_m: f64,
    ) -> Result<bool, TrajectoryError> {
        self.append(&TrackPoint::new(time_millis, lat_deg, lon_deg, alt_m))
    }

    /// Clear the wrapped trajectory and the interval memory
    pub fn clear(&mut self) {
        self.inner.clear();
        self.last_forwarded_millis = None;
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}
