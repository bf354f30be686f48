//! Storage Backends
//!
//! Three capacity disciplines, each generic over an encoding:
//!
//! - [`FixedTrajectory`]: exact-size, immutable once built; the result type
//!   of every snapshot operation
//! - [`GrowableTrajectory`]: mutable, amortized-doubling growth
//! - [`TraceTrajectory`]: mutable ring buffer, fixed footprint, keeps only
//!   the newest `capacity` points

mod circular;
mod fixed;
mod growable;
mod ring;

pub use circular::TraceTrajectory;
pub use fixed::FixedTrajectory;
pub use growable::GrowableTrajectory;
