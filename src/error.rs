//! Error types for trajectory storage and analysis

use thiserror::Error;

/// Errors that can occur when storing or querying trajectories
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Logical index outside `[0, len)`
    #[error("Index {index} out of bounds for trajectory of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Time delta not representable by a 32-bit millisecond field
    #[error("Time delta {delta_millis} ms outside encodable range 0..={max_millis} ms")]
    TimeRangeExceeded { delta_millis: i64, max_millis: i64 },

    /// Caller-supplied export slice shorter than the trajectory
    #[error("Export slice too short: need {needed} elements, got {got}")]
    ShortExportSlice { needed: usize, got: usize },

    /// Operation needs more stored points than are available
    #[error("Not enough points: need {needed}, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },

    /// Zero or negative time step passed to a sampling operation
    #[error("Invalid time step: {step_millis} ms")]
    InvalidTimeStep { step_millis: i64 },
}
