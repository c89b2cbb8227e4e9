use std::os::raw::c_int;

use thiserror::Error;

use crate::ffi;

#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rejected before reaching the engine.
    #[error("the outer loop has no points")]
    EmptyOuterLoop,

    /// The engine returned no result.
    #[error("triangulation failed: {0}")]
    TriangulationFailed(FailureReason),
}

/// Why the engine declined to produce a result.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("the engine rejected the input arrays")]
    InvalidInput,
    #[error("unsupported quality level")]
    InvalidQuality,
    #[error("a coordinate is not finite or is too large")]
    InvalidCoordinate,
    #[error("constraint segments cross or partially overlap")]
    IntersectingConstraints,
    #[error("internal engine error")]
    Internal,
    /// The engine reported no failure, or a code this crate does not know.
    #[error("no reason given")]
    Unknown,
}

impl FailureReason {
    pub(crate) fn from_status(status: c_int) -> Self {
        match status {
            ffi::STATUS_INVALID_INPUT => FailureReason::InvalidInput,
            ffi::STATUS_INVALID_QUALITY => FailureReason::InvalidQuality,
            ffi::STATUS_INVALID_COORDINATE => FailureReason::InvalidCoordinate,
            ffi::STATUS_INTERSECTING_CONSTRAINTS => FailureReason::IntersectingConstraints,
            ffi::STATUS_INTERNAL => FailureReason::Internal,
            // Includes 0 (ok): a null handle should never come with it.
            _ => FailureReason::Unknown,
        }
    }
}
