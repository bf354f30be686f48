//! Trajectory Interpolation
//!
//! An interpolant estimates a trajectory's position at arbitrary times
//! between (or, by extrapolation, slightly beyond) its stored points. The
//! interpolant is a swappable strategy behind [`InterpolantFactory`]; the
//! trajectory layer only drives the sampling loop.

use crate::encoding::AccurateEncoding;
use crate::error::TrajectoryError;
use crate::point::TrackPoint;
use crate::storage::GrowableTrajectory;
use crate::trajectory::{Trajectory, TrajectoryMut};

/// Positional evaluation of a trajectory at an arbitrary time
pub trait Interpolant {
    /// Estimated point at `time_millis`
    ///
    /// Times outside the source's coverage are extrapolated; validating the
    /// query range is the caller's business.
    fn eval(&self, time_millis: i64) -> TrackPoint;
}

/// Builds an interpolant over a trajectory's current points
pub trait InterpolantFactory {
    /// Fails with `NotEnoughPoints` when the trajectory holds fewer points
    /// than the algorithm needs
    fn build(&self, traj: &dyn Trajectory) -> Result<Box<dyn Interpolant>, TrajectoryError>;
}

/// Factory for [`LinearInterpolant`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolantFactory;

impl InterpolantFactory for LinearInterpolantFactory {
    fn build(&self, traj: &dyn Trajectory) -> Result<Box<dyn Interpolant>, TrajectoryError> {
        Ok(Box::new(LinearInterpolant::new(traj)?))
    }
}

/// Piecewise-linear interpolant over columnar copies of the source points
///
/// Owns its data, so it stays valid while the source trajectory keeps
/// mutating. Beyond the first/last point it extrapolates linearly along the
/// end segments.
#[derive(Debug)]
pub struct LinearInterpolant {
    times: Vec<i64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    alts: Vec<f64>,
}

impl LinearInterpolant {
    pub fn new(traj: &dyn Trajectory) -> Result<Self, TrajectoryError> {
        let n = traj.len();
        if n < 2 {
            return Err(TrajectoryError::NotEnoughPoints { needed: 2, got: n });
        }
        let mut times = vec![0i64; n];
        let mut lats = vec![0.0; n];
        let mut lons = vec![0.0; n];
        let mut alts = vec![0.0; n];
        traj.copy_to_arrays(&mut times, &mut lats, &mut lons, &mut alts)?;
        Ok(LinearInterpolant { times, lats, lons, alts })
    }

    /// Segment index `i` such that `times[i]..times[i+1]` brackets `t`,
    /// clamped to the end segments for out-of-range times
    fn segment(&self, t: i64) -> usize {
        let last_seg = self.times.len() - 2;
        match self.times.binary_search(&t) {
            Ok(i) => i.min(last_seg),
            Err(ins) => ins.saturating_sub(1).min(last_seg),
        }
    }
}

impl Interpolant for LinearInterpolant {
    fn eval(&self, time_millis: i64) -> TrackPoint {
        let i = self.segment(time_millis);
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let f = if t1 == t0 {
            0.0
        } else {
            (time_millis - t0) as f64 / (t1 - t0) as f64
        };
        let lerp = |a: f64, b: f64| a + f * (b - a);
        TrackPoint::new(
            time_millis,
            lerp(self.lats[i], self.lats[i + 1]),
            lerp(self.lons[i], self.lons[i + 1]),
            lerp(self.alts[i], self.alts[i + 1]),
        )
    }
}

/// Resample `traj` at evenly spaced times from `start_millis` to
/// `end_millis` inclusive
///
/// Produces a full-precision mutable trajectory pre-sized for
/// `(end - start) / step + 1` points; interpolated values are synthetic, so
/// they are not re-encoded lossily. `start`/`end` should lie within or near
/// the source's coverage - extrapolation is delegated to the interpolant.
pub fn interpolate(
    traj: &dyn Trajectory,
    start_millis: i64,
    end_millis: i64,
    step_millis: i64,
    factory: &dyn InterpolantFactory,
) -> Result<GrowableTrajectory<AccurateEncoding>, TrajectoryError> {
    if step_millis <= 0 {
        return Err(TrajectoryError::InvalidTimeStep { step_millis });
    }
    let ip = factory.build(traj)?;

    let n = if end_millis >= start_millis {
        ((end_millis - start_millis) / step_millis) as usize + 1
    } else {
        0
    };
    let mut out = GrowableTrajectory::new(AccurateEncoding::new(n.max(1)));

    let mut t = start_millis;
    while t <= end_millis {
        out.append(&ip.eval(t))?;
        t += step_millis;
    }
    Ok(out)
}
