//! Per-image start/end detection.
//!
//! Overview
//! - Two vertical search regions, one near each image border, are cut into
//!   stripes and labelled (see [`crate::stripes`]).
//! - Each region gets an [`Appearance`](crate::types::Appearance) and a valid
//!   row range; both combine into an [`ImageState`](crate::types::ImageState).
//! - When an edge is visible it is refined per side by the
//!   [`EdgeCalculator`](crate::edges::EdgeCalculator) and the valid range is
//!   moved onto the stripe bordering the edge.
//!
//! Modules
//! - [`params`] – configuration of the regions, stripes and edge window.
//! - `valid_range` – [`ImageValidRange`] and the image state table.
//! - `in_image` – the [`StartEndDetectionInImage`] driver.

mod in_image;
pub mod params;
mod valid_range;

pub use in_image::{DetectionResult, EdgeSearch, StartEndDetectionInImage};
pub use params::DetectionParams;
pub use valid_range::{compute_image_state, ImageValidRange};
