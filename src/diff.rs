//! Trajectory Comparison
//!
//! Statistical comparison of two trajectories (distance, altitude and
//! heading deviation, with extremal samples) plus closest-point queries.
//! The geodesic primitives are injected as pure functions, so callers pick
//! the distance/heading model; `crate::geo` provides spherical defaults.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geo::{heading_diff_deg, meters_per_degree_longitude, GeoPos, METERS_PER_DEGREE_LATITUDE};
use crate::interpolate::InterpolantFactory;
use crate::point::TrackPoint;
use crate::trajectory::Trajectory;

/// Running scalar statistics (Welford) with min/max tracking
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl SampleStats {
    pub fn new() -> Self {
        SampleStats {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the pushed samples; 0 when empty
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance; 0 when empty
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for SampleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// One compared sample: the diff point and the reference position
/// interpolated at its time
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSample {
    pub time_millis: i64,
    pub ref_point: TrackPoint,
    pub diff_point: TrackPoint,
    pub distance_m: f64,
}

/// Aggregate deviation statistics between two trajectories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryDiff {
    /// 2D distance between diff points and the interpolated reference, meters
    pub distance: SampleStats,
    /// Altitude difference (diff - ref), meters
    pub altitude: SampleStats,
    /// Heading difference between consecutive-sample headings, degrees
    /// in [-180, 180]
    pub heading: SampleStats,
    /// Sample achieving the maximum 2D distance
    pub max_distance_sample: DiffSample,
    /// Sample achieving the minimum 2D distance
    pub min_distance_sample: DiffSample,
}

impl TrajectoryDiff {
    /// Number of samples that passed the filters
    pub fn samples(&self) -> u64 {
        self.distance.count()
    }

    /// Compare `diff_traj` against `ref_traj`
    ///
    /// For every point of `diff_traj` that passes `area_filter` and whose
    /// time falls within `ref_traj`'s covered range, the reference is
    /// interpolated at that exact time; if the interpolated position also
    /// passes `area_filter`, distance and altitude deviations are
    /// accumulated. Headings are taken between consecutive accepted samples
    /// of each trajectory, so the first accepted sample contributes no
    /// heading.
    ///
    /// `None` when the reference has fewer than two points or no sample
    /// passed the filters.
    pub fn calculate<F, D, H>(
        ref_traj: &dyn Trajectory,
        diff_traj: &dyn Trajectory,
        factory: &dyn InterpolantFactory,
        area_filter: F,
        distance_fn: D,
        heading_fn: H,
    ) -> Option<TrajectoryDiff>
    where
        F: Fn(&TrackPoint) -> bool,
        D: Fn(&TrackPoint, &TrackPoint) -> f64,
        H: Fn(&TrackPoint, &TrackPoint) -> f64,
    {
        if ref_traj.len() < 2 {
            return None;
        }
        let ip = factory.build(ref_traj).ok()?;
        let (ref_start, ref_end) = (ref_traj.first_time()?, ref_traj.last_time()?);

        let mut distance = SampleStats::new();
        let mut altitude = SampleStats::new();
        let mut heading = SampleStats::new();
        let mut max_sample: Option<DiffSample> = None;
        let mut min_sample: Option<DiffSample> = None;
        let mut prev: Option<(TrackPoint, TrackPoint)> = None; // (diff, ref)

        for i in 0..diff_traj.len() {
            let Ok(p) = diff_traj.get(i) else { continue };
            if p.time_millis < ref_start || p.time_millis > ref_end || !area_filter(&p) {
                continue;
            }
            let r = ip.eval(p.time_millis);
            if !area_filter(&r) {
                continue;
            }

            let d = distance_fn(&r, &p);
            distance.push(d);
            altitude.push(p.alt_m - r.alt_m);

            if let Some((prev_diff, prev_ref)) = prev {
                let ref_heading = heading_fn(&prev_ref, &r);
                let diff_heading = heading_fn(&prev_diff, &p);
                heading.push(heading_diff_deg(ref_heading, diff_heading));
            }
            prev = Some((p, r));

            let sample = DiffSample {
                time_millis: p.time_millis,
                ref_point: r,
                diff_point: p,
                distance_m: d,
            };
            if max_sample.map_or(true, |s| d > s.distance_m) {
                max_sample = Some(sample);
            }
            if min_sample.map_or(true, |s| d < s.distance_m) {
                min_sample = Some(sample);
            }
        }

        Some(TrajectoryDiff {
            distance,
            altitude,
            heading,
            max_distance_sample: max_sample?,
            min_distance_sample: min_sample?,
        })
    }
}

/// Closest-point query result
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestPoint {
    pub time_millis: i64,
    pub point: TrackPoint,
    pub distance_m: f64,
}

/// Iterative closest point: walk the interpolant at fixed `step_millis` from
/// the trajectory's first to last time, returning as soon as the distance
/// starts increasing
///
/// Assumes a single-minimum distance profile; a track that approaches the
/// position twice yields the first local minimum, not necessarily the global
/// one. `None` when the end is reached while the distance is still
/// decreasing, or when the trajectory cannot be interpolated.
pub fn closest_point_iter<D>(
    traj: &dyn Trajectory,
    pos: GeoPos,
    step_millis: i64,
    factory: &dyn InterpolantFactory,
    distance_fn: D,
) -> Option<ClosestPoint>
where
    D: Fn(GeoPos, GeoPos) -> f64,
{
    if step_millis <= 0 {
        return None;
    }
    let ip = factory.build(traj).ok()?;
    let (start, end) = (traj.first_time()?, traj.last_time()?);

    let mut best: Option<ClosestPoint> = None;
    let mut t = start;
    while t <= end {
        let p = ip.eval(t);
        let d = distance_fn(pos, p.pos());
        match best {
            Some(b) if d > b.distance_m => return best,
            _ => {
                best = Some(ClosestPoint {
                    time_millis: t,
                    point: p,
                    distance_m: d,
                })
            }
        }
        t += step_millis;
    }
    None
}

/// Segment-projection closest point in a locally flattened lat/lon plane
///
/// Consecutive points are treated as straight segments with longitude scaled
/// by the cosine of the mean latitude; the perpendicular foot point is found
/// per segment via a dot-product test and the first segment whose projection
/// parameter lies in [0, 1] wins, with time interpolated linearly along it.
///
/// Not valid near the poles or for long legs where the flat-plane
/// approximation breaks down.
pub fn closest_point_linear(traj: &dyn Trajectory, pos: GeoPos) -> Option<ClosestPoint> {
    let n = traj.len();
    if n < 2 {
        return None;
    }

    for i in 0..n - 1 {
        let a = traj.get(i).ok()?;
        let b = traj.get(i + 1).ok()?;

        let ky = METERS_PER_DEGREE_LATITUDE;
        let kx = meters_per_degree_longitude((a.lat_deg + b.lat_deg) / 2.0);

        let to_pos = Vector2::new((pos.lon_deg - a.lon_deg) * kx, (pos.lat_deg - a.lat_deg) * ky);
        let seg = Vector2::new((b.lon_deg - a.lon_deg) * kx, (b.lat_deg - a.lat_deg) * ky);

        let seg_len2 = seg.dot(&seg);
        if seg_len2 == 0.0 {
            continue; // degenerate segment
        }
        let s = to_pos.dot(&seg) / seg_len2;
        if (0.0..=1.0).contains(&s) {
            let time_millis = a.time_millis + ((b.time_millis - a.time_millis) as f64 * s).round() as i64;
            let point = TrackPoint::new(
                time_millis,
                a.lat_deg + s * (b.lat_deg - a.lat_deg),
                a.lon_deg + s * (b.lon_deg - a.lon_deg),
                a.alt_m + s * (b.alt_m - a.alt_m),
            );
            let distance_m = (to_pos - seg * s).norm();
            return Some(ClosestPoint {
                time_millis,
                point,
                distance_m,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::AccurateEncoding;
    use crate::geo::{great_circle_distance_m, initial_bearing_deg};
    use crate::interpolate::LinearInterpolantFactory;
    use crate::storage::GrowableTrajectory;
    use crate::trajectory::TrajectoryMut;

    fn dist(a: &TrackPoint, b: &TrackPoint) -> f64 {
        great_circle_distance_m(a.pos(), b.pos())
    }

    fn hdg(a: &TrackPoint, b: &TrackPoint) -> f64 {
        initial_bearing_deg(a.pos(), b.pos())
    }

    fn northbound(offset_lon: f64, offset_alt: f64) -> GrowableTrajectory<AccurateEncoding> {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(8));
        for i in 0..6i64 {
            t.append_values(
                i * 10_000,
                39.0 + 0.01 * i as f64,
                -98.0 + offset_lon,
                3000.0 + offset_alt,
            )
            .unwrap();
        }
        t
    }

    #[test]
    fn test_identical_trajectories_diff_to_zero() {
        let a = northbound(0.0, 0.0);
        let b = northbound(0.0, 0.0);

        let diff = TrajectoryDiff::calculate(
            &a,
            &b,
            &LinearInterpolantFactory,
            |_| true,
            dist,
            hdg,
        )
        .unwrap();

        assert_eq!(diff.samples(), 6);
        assert!(diff.distance.mean() < 1e-6);
        assert!(diff.distance.variance() < 1e-9);
        assert!(diff.altitude.mean().abs() < 1e-9);
        assert!(diff.altitude.variance() < 1e-12);
        assert!(diff.heading.mean().abs() < 1e-9);
    }

    #[test]
    fn test_parallel_offset_statistics() {
        let reference = northbound(0.0, 0.0);
        let shifted = northbound(0.001, 250.0); // ~86 m east, 250 m above

        let diff = TrajectoryDiff::calculate(
            &reference,
            &shifted,
            &LinearInterpolantFactory,
            |_| true,
            dist,
            hdg,
        )
        .unwrap();

        assert_eq!(diff.samples(), 6);
        // constant lateral offset: mean ~86 m, negligible variance
        assert!((diff.altitude.mean() - 250.0).abs() < 1e-9);
        assert!(diff.distance.mean() > 80.0 && diff.distance.mean() < 95.0);
        assert!(diff.distance.variance() < 1.0);
        // parallel headings
        assert!(diff.heading.mean().abs() < 0.1);
        // extremal samples carry timestamps from the diff trajectory
        assert!(diff.max_distance_sample.time_millis >= 0);
        assert!(diff.min_distance_sample.distance_m <= diff.max_distance_sample.distance_m);
    }

    #[test]
    fn test_area_filter_excludes_all() {
        let a = northbound(0.0, 0.0);
        let b = northbound(0.0, 0.0);
        let diff = TrajectoryDiff::calculate(
            &a,
            &b,
            &LinearInterpolantFactory,
            |_| false,
            dist,
            hdg,
        );
        assert!(diff.is_none());
    }

    #[test]
    fn test_short_reference_yields_none() {
        let mut a = GrowableTrajectory::new(AccurateEncoding::new(2));
        a.append_values(0, 39.0, -98.0, 0.0).unwrap();
        let b = northbound(0.0, 0.0);
        assert!(TrajectoryDiff::calculate(
            &a,
            &b,
            &LinearInterpolantFactory,
            |_| true,
            dist,
            hdg
        )
        .is_none());
    }

    #[test]
    fn test_closest_point_iter_single_approach() {
        // northbound track passing abeam of a point east of its midpoint
        let t = northbound(0.0, 0.0);
        let pos = GeoPos::new(39.025, -97.9);

        let c = closest_point_iter(
            &t,
            pos,
            1000,
            &LinearInterpolantFactory,
            great_circle_distance_m,
        )
        .unwrap();

        // closest approach is abeam: latitude matches the query position
        assert!((c.point.lat_deg - 39.025).abs() < 0.002);
        assert!(c.distance_m < 9000.0);
    }

    #[test]
    fn test_closest_point_iter_still_decreasing_is_none() {
        // query ahead of the end of the track: distance decreases to the end
        let t = northbound(0.0, 0.0);
        let pos = GeoPos::new(39.2, -98.0);
        assert!(closest_point_iter(
            &t,
            pos,
            1000,
            &LinearInterpolantFactory,
            great_circle_distance_m
        )
        .is_none());
    }

    #[test]
    fn test_closest_point_linear_projection() {
        // equator-adjacent eastbound segment, query point due south of its middle
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(2));
        t.append_values(0, 0.0, 0.0, 100.0).unwrap();
        t.append_values(100_000, 0.0, 1.0, 300.0).unwrap();

        let c = closest_point_linear(&t, GeoPos::new(-0.1, 0.5)).unwrap();

        assert!((c.point.lon_deg - 0.5).abs() < 1e-9);
        assert!(c.point.lat_deg.abs() < 1e-9);
        assert_eq!(c.time_millis, 50_000);
        assert!((c.point.alt_m - 200.0).abs() < 1e-9);
        // 0.1 deg of latitude south of the segment
        assert!((c.distance_m - 0.1 * METERS_PER_DEGREE_LATITUDE).abs() < 1.0);
    }

    #[test]
    fn test_closest_point_linear_no_projection() {
        let mut t = GrowableTrajectory::new(AccurateEncoding::new(2));
        t.append_values(0, 0.0, 0.0, 0.0).unwrap();
        t.append_values(100_000, 0.0, 1.0, 0.0).unwrap();

        // behind the start of the only segment
        assert!(closest_point_linear(&t, GeoPos::new(0.0, -0.5)).is_none());
    }
}
