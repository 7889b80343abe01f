#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod roi;
pub mod seam;
pub mod types;

// Building blocks of the per-image classification.
pub mod detector;
pub mod edges;
pub mod stripes;

// --- High-level re-exports -------------------------------------------------

// Main entry points: seam engine + per-image results.
pub use crate::seam::{
    Direction, EdgeMisalignment, SearchForEdges, SeamConfig, SeamState, StartEndDetectionInSeam,
};
pub use crate::types::{ImageStateEvaluation, InputImageContext, StartEndInfo};

// Per-image detector for callers that track the seam themselves.
pub use crate::detector::{DetectionParams, EdgeSearch, StartEndDetectionInImage};

pub use crate::error::DetectionError;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use start_end_detector::prelude::*;
///
/// # fn main() -> Result<(), DetectionError> {
/// let (w, h) = (500usize, 250usize);
/// let gray = vec![0u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let mut seam = StartEndDetectionInSeam::default();
/// seam.set_direction(Direction::FromBelow);
/// seam.process(&img, InputImageContext::default())?;
/// println!("{}", seam.state_summary());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{
        DetectionError, Direction, InputImageContext, SeamState, StartEndDetectionInSeam,
    };
}
