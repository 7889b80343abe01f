//! Seam-level start/end detection.
//!
//! Overview
//! - [`StartEndDetectionInSeam`] runs the per-image detector on every image of
//!   a seam scan and folds the classifications into a [`SeamState`].
//! - Start and end edges are stored per side (left/right) so the skew between
//!   them can be reported as an [`EdgeMisalignment`].
//! - Positions where the material starts and ends along the seam are recorded
//!   as transitions, in the units of the image context (usually mm).
//!
//! Modules
//! - [`config`] – travel direction, searched edges and partial-edge policy.
//! - [`state`] – seam state vocabulary and transition tables.
//! - [`misalignment`] – stored edges and their left/right skew.
//! - [`position`] – helpers on top of the engine outputs (seam position hints,
//!   seam length, result quality).
//! - `engine` – the [`StartEndDetectionInSeam`] itself.

pub mod config;
mod engine;
pub mod misalignment;
pub mod position;
pub mod state;

pub use config::{Direction, SearchForEdges, SeamConfig};
pub use engine::StartEndDetectionInSeam;
pub use misalignment::{EdgeMisalignment, EdgePositionInSeam};
pub use position::{
    sanitize_threshold, seam_position_info, start_end_quality, SeamLength, SeamPositionInfo,
};
pub use state::{EdgeKind, EdgeSide, SeamState, WaitingForEdge};

#[cfg(test)]
mod tests;
