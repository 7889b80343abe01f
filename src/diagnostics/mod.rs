//! Serializable snapshots of the seam engine for tools and debugging.
//!
//! `ImageReport` captures what the engine concluded from one image (state,
//! evaluation, valid rows, stripe labels and edge samples of both sides).
//! `SeamSummary` condenses the seam-level results once a sequence has been
//! processed. Both serialize to camelCase JSON.

pub mod report;
pub mod timing;

pub use report::{ImageReport, SeamReport, SeamSummary, SideReport, StripeSample};
pub use timing::{StageTiming, TimingBreakdown};
