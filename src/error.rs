//! Error type for the few hard preconditions of the detection entry points.
//!
//! Classification failures are never errors: they surface as `Unknown`,
//! `Invalid` or `-1` values in the results. Only a buffer that cannot be read
//! as an image is rejected.
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DetectionError {
    /// Width or height is zero.
    #[error("image has zero area ({width}x{height})")]
    EmptyImage { width: usize, height: usize },
    /// Row stride shorter than a row.
    #[error("image stride {stride} is smaller than width {width}")]
    InvalidStride { stride: usize, width: usize },
    /// Backing slice shorter than `stride * (h - 1) + w`.
    #[error("image buffer holds {actual} bytes, {expected} required")]
    BufferTooSmall { expected: usize, actual: usize },
}
