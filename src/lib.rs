//! # geotraj
//!
//! Trajectory storage core for simulations that track many concurrently
//! moving objects: time-ordered sequences of 3D geographic positions under
//! three space/accuracy tradeoffs, with bounded-memory variants, immutable
//! snapshots, interpolation and cross-trajectory comparison.
//!
//! This crate contains pure in-memory data structures and numerics with
//! **zero I/O dependencies**: nothing here blocks, suspends or touches the
//! network or filesystem. Rendering, geodesy beyond two pure functions,
//! configuration and transport are consumers of this crate, not part of it.
//!
//! ## Architecture
//!
//! Encodings and storage backends compose orthogonally; the facade traits
//! are implemented once per backend, generically over the encoding:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  trajectory facade (Trajectory / TrajectoryMut)               │
//! │  ├── storage/   Fixed | Growable | Trace (ring buffer)        │
//! │  ├── encoding/  Accurate | Offset | Compressed                │
//! │  ├── interpolate/ diff/ filter/   (consumers of the facade)   │
//! │  └── point/ geo/ error/           (exchange & support types)  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Picking a trajectory type
//!
//! | Alias                      | Backing              | Use for            |
//! |----------------------------|----------------------|--------------------|
//! | `MutAccurateTrajectory`    | growable, exact      | analysis inputs    |
//! | `MutCompressedTrajectory`  | growable, ~1 cm      | bulk history       |
//! | `MutOffsetTrajectory`      | growable, sub-meter  | regional sims      |
//! | `*Trace`                   | ring buffer          | live trails        |
//! | `*Trajectory` (fixed)      | immutable snapshot   | shared readers     |
//!
//! ## Example
//!
//! ```rust
//! use geotraj::{AccurateEncoding, GrowableTrajectory, Trajectory, TrajectoryMut};
//!
//! let mut track = GrowableTrajectory::new(AccurateEncoding::new(16));
//! track.append_values(0, 39.8283, -98.5795, 1000.0).unwrap();
//! track.append_values(60_000, 39.8383, -98.5795, 1100.0).unwrap();
//!
//! let snapshot = track.snapshot(); // immutable, independent
//! track.append_values(120_000, 39.8483, -98.5795, 1200.0).unwrap();
//!
//! assert_eq!(snapshot.len(), 2);
//! assert_eq!(track.len(), 3);
//! ```
//!
//! ## Concurrency model
//!
//! Each mutable trajectory is single-writer with no built-in
//! synchronization; serialize mutation externally (the intended pattern is
//! one instance per tracked object, owned by its update path). Immutable
//! snapshots are never mutated after creation and can be read from any
//! number of threads.

pub mod diff;
pub mod encoding;
pub mod error;
pub mod filter;
pub mod geo;
pub mod interpolate;
pub mod point;
pub mod storage;
pub mod trajectory;

// Re-export commonly used types
pub use diff::{closest_point_iter, closest_point_linear, ClosestPoint, DiffSample, SampleStats, TrajectoryDiff};
pub use encoding::{
    AccurateEncoding, CompressedEncoding, Encoding, OffsetEncoding, MAX_TIME_DELTA_MILLIS,
};
pub use error::TrajectoryError;
pub use filter::MinIntervalFilter;
pub use geo::{GeoPos, CONUS_CENTER};
pub use interpolate::{
    interpolate, Interpolant, InterpolantFactory, LinearInterpolant, LinearInterpolantFactory,
};
pub use point::TrackPoint;
pub use storage::{FixedTrajectory, GrowableTrajectory, TraceTrajectory};
pub use trajectory::{Trajectory, TrajectoryIter, TrajectoryMut};

/// Immutable full-precision trajectory
pub type AccurateTrajectory = FixedTrajectory<AccurateEncoding>;
/// Growable full-precision trajectory
pub type MutAccurateTrajectory = GrowableTrajectory<AccurateEncoding>;
/// Ring-buffer full-precision trace
pub type AccurateTrace = TraceTrajectory<AccurateEncoding>;

/// Immutable offset-encoded trajectory
pub type OffsetTrajectory = FixedTrajectory<OffsetEncoding>;
/// Growable offset-encoded trajectory
pub type MutOffsetTrajectory = GrowableTrajectory<OffsetEncoding>;
/// Ring-buffer offset-encoded trace
pub type OffsetTrace = TraceTrajectory<OffsetEncoding>;

/// Immutable compressed trajectory
pub type CompressedTrajectory = FixedTrajectory<CompressedEncoding>;
/// Growable compressed trajectory
pub type MutCompressedTrajectory = GrowableTrajectory<CompressedEncoding>;
/// Ring-buffer compressed trace
pub type CompressedTrace = TraceTrajectory<CompressedEncoding>;

#[cfg(test)]
mod tests {
    use super::*;

    // cross-module scenario: a compressed ring trace feeding a bounded
    // live-trail display, snapshotted for a reader
    #[test]
    fn test_live_trail_pipeline() {
        let mut trail = CompressedTrace::new(CompressedEncoding::new(4));
        let mut filter = MinIntervalFilter::new(
            MutCompressedTrajectory::new(CompressedEncoding::new(8)),
            5_000,
        );

        for i in 0..10i64 {
            let p = TrackPoint::new(i * 2_000, 37.0 + 0.001 * i as f64, -122.0, 900.0);
            trail.append(&p).unwrap();
            filter.append(&p).unwrap();
        }

        // trace keeps the newest 4 of 10
        assert_eq!(trail.len(), 4);
        assert_eq!(trail.total_appended(), 10);
        assert_eq!(trail.first_time(), Some(12_000));

        // filter thinned 2 s input to >= 5 s spacing: t = 0, 6, 12, 18 s
        assert_eq!(filter.inner().len(), 4);
        assert_eq!(filter.inner().last_time(), Some(18_000));

        let snap = trail.snapshot();
        assert_eq!(snap.len(), 4);
        assert_eq!(snap.snapshot().len(), 4); // snapshot-stable
    }
}
