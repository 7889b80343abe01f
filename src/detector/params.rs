//! Parameters of the per-image start/end detection.

use crate::stripes::{ImageStripeCalculator, StripeRoi};
use serde::{Deserialize, Serialize};

/// Knobs of [`StartEndDetectionInImage`](super::StartEndDetectionInImage).
///
/// Defaults suit 8-bit images where background stays well below 50 grey
/// levels and lit material well above.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Width of the left search region in pixels; `0` disables the side.
    pub search_width_left: i32,
    /// Width of the right search region in pixels; `0` disables the side.
    pub search_width_right: i32,
    /// Distance of both search regions from the image border.
    pub offset_left_right: i32,
    /// Side of the square window used to refine the edge.
    pub resolution_for_edge_recognition: i32,
    /// Mean grey value a refinement window must exceed to count as material.
    pub thresh_material_for_edge_recognition: i32,
    /// Expected slope of the edge (`dy/dx`).
    pub inclination: f64,
    /// Height of one classification stripe in rows.
    pub stripe_height: i32,
    /// Rows searched beyond the border stripe on the background side.
    pub stripe_offset: i32,
    /// Classify one region spanning the whole width instead of two sides.
    pub search_whole_image_for_background: bool,
    /// Stripe thresholds and sampling steps.
    pub stripe: ImageStripeCalculator,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            search_width_left: 100,
            search_width_right: 100,
            offset_left_right: 0,
            resolution_for_edge_recognition: 4,
            thresh_material_for_edge_recognition: 50,
            inclination: 0.0,
            stripe_height: 10,
            stripe_offset: 10,
            search_whole_image_for_background: false,
            stripe: ImageStripeCalculator::default(),
        }
    }
}

impl DetectionParams {
    pub(crate) fn roi(&self, x: f64, width: i32) -> StripeRoi {
        StripeRoi::new(x, width, self.inclination, self.stripe_height)
    }
}
