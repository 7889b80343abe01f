use super::TimingBreakdown;
use crate::seam::{start_end_quality, SeamLength, SeamState, StartEndDetectionInSeam};
use crate::types::{EdgePositionInImage, ImageStateEvaluation, InputImageContext, StartEndInfo};
use serde::Serialize;

/// Label of one stripe at its centre in image coordinates.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeSample {
    pub center: [f64; 2],
    pub is_material: bool,
}

/// What one search region looked like in the last image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideReport {
    pub edge: EdgePositionInImage,
    pub stripes: Vec<StripeSample>,
    pub edge_points: Vec<[i32; 2]>,
}

impl SideReport {
    fn capture(seam: &StartEndDetectionInSeam, left: bool) -> Self {
        let edge = if left {
            seam.left_edge_in_last_image()
        } else {
            seam.right_edge_in_last_image()
        };
        Self {
            edge,
            stripes: seam
                .stripes_result_in_last_image(left)
                .into_iter()
                .map(|(p, is_material)| StripeSample {
                    center: [p.x, p.y],
                    is_material,
                })
                .collect(),
            edge_points: seam
                .edge_points_in_last_image(left)
                .iter()
                .map(|p| [p.x, p.y])
                .collect(),
        }
    }
}

/// Engine outputs right after processing one image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    pub context: InputImageContext,
    pub seam_state: SeamState,
    pub evaluation: ImageStateEvaluation,
    pub info: StartEndInfo,
    pub left: SideReport,
    pub right: SideReport,
}

impl ImageReport {
    /// Snapshot of the last processed image; `offset` is passed to
    /// [`StartEndDetectionInSeam::last_image_start_end_info`].
    pub fn capture(seam: &StartEndDetectionInSeam, offset: i32) -> Self {
        Self {
            context: *seam.last_image_context(),
            seam_state: seam.seam_state(),
            evaluation: seam.last_image_evaluation(),
            info: seam.last_image_start_end_info(offset),
            left: SideReport::capture(seam, true),
            right: SideReport::capture(seam, false),
        }
    }
}

/// Seam-level results after the last image.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeamSummary {
    pub seam_state: SeamState,
    pub consistent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_misalignment_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_misalignment_mm: Option<f64>,
    pub transition_from_background_mm: f64,
    pub transition_from_full_image_mm: f64,
    pub seam_length: SeamLength,
    pub both_edges_found: bool,
    pub definitive: bool,
}

impl SeamSummary {
    /// `is_seam_end` marks the summary taken after the last image of the seam.
    pub fn capture(seam: &StartEndDetectionInSeam, is_seam_end: bool) -> Self {
        let start = seam.transition_from_background();
        let end = seam.transition_from_full_image();
        let current = seam.last_image_context().image_position_mm;
        let (both_edges_found, definitive) = start_end_quality(seam.seam_state(), is_seam_end);
        Self {
            seam_state: seam.seam_state(),
            consistent: seam.is_seam_state_consistent(),
            start_misalignment_mm: seam.compute_edge_misalignment(true).misalignment_mm(),
            end_misalignment_mm: seam.compute_edge_misalignment(false).misalignment_mm(),
            transition_from_background_mm: start,
            transition_from_full_image_mm: end,
            seam_length: SeamLength::compute(start, end, current),
            both_edges_found,
            definitive,
        }
    }
}

/// Full report written by the sequence tool.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeamReport {
    pub images: Vec<ImageReport>,
    pub summary: SeamSummary,
    pub timings: TimingBreakdown,
}
