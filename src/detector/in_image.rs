//! Start/end classification of a single image.

use super::params::DetectionParams;
use super::valid_range::ImageValidRange;
use crate::edges::EdgeCalculator;
use crate::error::DetectionError;
use crate::image::ImageU8;
use crate::stripes::{
    update_valid_range, RoiValidRange, StripeEvaluation, StripePositioning, StripesResult,
};
use crate::types::{Appearance, EdgePositionInImage, FittedLine, ImageState, StartEndInfo};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Which edge orientations the caller is prepared to accept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeSearch {
    #[default]
    BothDirections,
    OnlyBackgroundOnTop,
    OnlyBackgroundOnBottom,
}

/// Outcome of the last processed image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub valid_range: ImageValidRange,
    pub left_edge: EdgePositionInImage,
    pub right_edge: EdgePositionInImage,
}

impl DetectionResult {
    pub fn edge(&self, left: bool) -> &EdgePositionInImage {
        if left {
            &self.left_edge
        } else {
            &self.right_edge
        }
    }
}

#[derive(Clone, Debug)]
struct StripeSearch {
    positioning: StripePositioning,
    stripes: StripesResult,
}

#[derive(Clone, Debug, Default)]
struct EdgeArea {
    x: i32,
    width: i32,
    points: Vec<Point2<i32>>,
}

/// Classifies one image through a left and a right search region.
///
/// The detector keeps the stripe labels and edge samples of the last image
/// for diagnostics; parameters survive [`reset_state`](Self::reset_state).
#[derive(Clone, Debug)]
pub struct StartEndDetectionInImage {
    params: DetectionParams,
    stripe_searches: Vec<StripeSearch>,
    edge_areas: [EdgeArea; 2],
    last_result: DetectionResult,
    last_image_width: i32,
}

impl Default for StartEndDetectionInImage {
    fn default() -> Self {
        Self::new(DetectionParams::default())
    }
}

impl StartEndDetectionInImage {
    pub fn new(params: DetectionParams) -> Self {
        Self {
            params,
            stripe_searches: Vec::new(),
            edge_areas: Default::default(),
            last_result: DetectionResult::default(),
            last_image_width: 0,
        }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DetectionParams {
        &mut self.params
    }

    pub fn last_result(&self) -> &DetectionResult {
        &self.last_result
    }

    pub fn has_edge(&self) -> bool {
        self.last_result.valid_range.is_edge_visible()
    }

    /// Clear the per-image outputs.
    pub fn reset_state(&mut self) {
        for area in &mut self.edge_areas {
            area.points.clear();
        }
        self.last_result = DetectionResult::default();
    }

    /// Classify `image`, refining the edge position when one is visible.
    ///
    /// Edges whose orientation is excluded by `edge_search` make their region
    /// `Unsupported`.
    pub fn process(
        &mut self,
        image: &ImageU8<'_>,
        edge_search: EdgeSearch,
        min_stripes_material: usize,
    ) -> Result<(), DetectionError> {
        image.validate()?;
        self.reset_state();
        self.last_image_width = image.w as i32;

        self.init_stripe_searches(image.w, image.h);
        self.detect_valid_range(image, edge_search, min_stripes_material);

        if self.last_result.valid_range.is_edge_visible() {
            self.detect_edge_positions(image);
            // oblique edges move the usable rows
            self.update_valid_range_from_edges(image.w, image.h);
        }

        if self.params.search_width_left == 0 {
            self.last_result.left_edge.appearance = Appearance::NotAvailable;
        }
        if self.params.search_width_right == 0 {
            self.last_result.right_edge.appearance = Appearance::NotAvailable;
        }

        let range = &self.last_result.valid_range;
        debug!(
            "StartEndDetectionInImage::process {}x{} search={:?} left={:?} right={:?} state={:?}",
            image.w,
            image.h,
            edge_search,
            range.sub_range(true).appearance,
            range.sub_range(false).appearance,
            range.image_state()
        );
        Ok(())
    }

    /// Take the image as full material without looking at it.
    pub fn process_as_full_image(&mut self, width: usize, height: usize) {
        self.reset_state();
        self.last_image_width = width as i32;
        let empty = StripePositioning::new(width, height, self.params.roi(0.0, 0));
        self.stripe_searches = vec![
            StripeSearch {
                positioning: empty.clone(),
                stripes: Vec::new(),
            },
            StripeSearch {
                positioning: empty.clone(),
                stripes: Vec::new(),
            },
        ];
        let full = RoiValidRange {
            appearance: Appearance::AllMaterial,
            border_background_stripe: -1,
            start_valid_range_y: 0,
            end_valid_range_y: height as i32 - 2,
            positioning: empty,
        };
        self.last_result.valid_range = ImageValidRange::new(full.clone(), full);
    }

    fn init_stripe_searches(&mut self, width: usize, height: usize) {
        let w = width as i32;
        self.stripe_searches.clear();
        let rois = if self.params.search_whole_image_for_background {
            vec![self.params.roi(0.0, w)]
        } else {
            let half = (f64::from(w) * 0.5) as i32;
            let width_left = self.params.search_width_left.min(half);
            let width_right = self.params.search_width_right.min(half);
            let offset = self.params.offset_left_right;
            vec![
                self.params.roi(f64::from(offset), width_left),
                self.params.roi(f64::from(w - width_right - offset), width_right),
            ]
        };
        self.stripe_searches = rois
            .into_iter()
            .map(|roi| StripeSearch {
                positioning: StripePositioning::new(width, height, roi),
                stripes: Vec::new(),
            })
            .collect();
    }

    fn detect_valid_range(
        &mut self,
        image: &ImageU8<'_>,
        edge_search: EdgeSearch,
        min_stripes_material: usize,
    ) {
        let mut ranges = Vec::with_capacity(2);
        for search in &mut self.stripe_searches {
            search.stripes = self.params.stripe.examine_stripes(image, &search.positioning);
            let mut range =
                update_valid_range(&search.stripes, &search.positioning, min_stripes_material);
            match (edge_search, range.appearance) {
                (EdgeSearch::OnlyBackgroundOnBottom, Appearance::BackgroundOnTop)
                | (EdgeSearch::OnlyBackgroundOnTop, Appearance::BackgroundOnBottom) => {
                    range.appearance = Appearance::Unsupported;
                }
                _ => {}
            }
            ranges.push(range);
        }
        let left = ranges.first().cloned().unwrap_or_default();
        let right = ranges.get(1).cloned().unwrap_or_else(|| left.clone());
        self.last_result.valid_range = ImageValidRange::new(left, right);
    }

    fn detect_edge_positions(&mut self, image: &ImageU8<'_>) {
        let w = image.w as i32;
        let width_left = self.params.search_width_left.min(w);
        let width_right = self.params.search_width_right.min(w);
        let offset = self.params.offset_left_right;
        self.edge_areas[0].x = offset;
        self.edge_areas[0].width = width_left;
        self.edge_areas[1].x = w - width_right - offset;
        self.edge_areas[1].width = width_right;

        let mut calculator = EdgeCalculator::new(
            self.params.thresh_material_for_edge_recognition,
            self.params.resolution_for_edge_recognition,
            self.params.stripe_offset,
        );
        for (side, left) in [(0usize, true), (1usize, false)] {
            let range = self.last_result.valid_range.sub_range(left);
            let area = &mut self.edge_areas[side];
            area.points.clear();
            let edge = if range.is_edge() {
                let edge = *calculator.calc_edge_position(image, range, area.x, area.width);
                area.points.extend_from_slice(calculator.last_points());
                edge
            } else {
                EdgePositionInImage::new(range.appearance, FittedLine::UNSET)
            };
            if left {
                self.last_result.left_edge = edge;
            } else {
                self.last_result.right_edge = edge;
            }
        }
    }

    fn update_valid_range_from_edges(&mut self, width: usize, height: usize) {
        let mid_x = width as f64 / 2.0;
        for left in [true, false] {
            let mut range = self.last_result.valid_range.sub_range(left).clone();
            if !range.is_edge() {
                continue;
            }
            let midline = range
                .positioning
                .stripe_midline_in_image(range.border_background_stripe);
            let row = (midline.y(mid_x).round() as i32).clamp(0, height as i32);
            if range.appearance == Appearance::BackgroundOnTop {
                range.start_valid_range_y = row;
            } else {
                range.end_valid_range_y = row;
            }
            if left {
                self.last_result.valid_range.set_left(range);
            } else {
                self.last_result.valid_range.set_right(range);
            }
        }
    }

    /// Usable rows and edge summary of the last image.
    ///
    /// `offset` shrinks the range on the dark sides: the start row moves down
    /// by `offset` when the top is dark, the end row moves up when the bottom
    /// is dark. The evaluation is left `Unknown` for the seam to fill in.
    pub fn last_image_start_end_info(&self, offset: i32) -> StartEndInfo {
        let range = &self.last_result.valid_range;
        let mut info = StartEndInfo {
            image_state: range.image_state(),
            image_width: self.last_image_width,
            thresh_background: self.params.stripe.threshold_background,
            thresh_material: self.params.thresh_material_for_edge_recognition,
            ..StartEndInfo::default()
        };

        let apply_offset = |info: &mut StartEndInfo| {
            if offset == 0 {
                return;
            }
            if info.is_top_dark {
                info.start_valid_range_y = (info.start_valid_range_y + offset).max(0);
            }
            if info.is_bottom_dark {
                info.end_valid_range_y = (info.end_valid_range_y - offset).max(0);
            }
        };
        let partial_edge = |info: &mut StartEndInfo, edge_side: &RoiValidRange, other: Appearance| {
            info.is_cropped = true;
            info.is_bottom_dark = edge_side.appearance == Appearance::BackgroundOnBottom;
            info.is_top_dark = edge_side.appearance == Appearance::BackgroundOnTop;
            info.is_bottom_material = !info.is_bottom_dark;
            info.is_top_material = !info.is_top_dark;
            info.border_bg_stripe_y = edge_side.border_stripe_y();
            info.start_valid_range_y = edge_side.start_valid_range_y;
            info.end_valid_range_y = edge_side.end_valid_range_y;
            apply_offset(info);
            let other_dark = other == Appearance::AllBackground;
            let other_material = other == Appearance::AllMaterial;
            info.is_bottom_dark |= other_dark;
            info.is_top_dark |= other_dark;
            info.is_top_material |= other_material;
            info.is_bottom_material |= other_material;
        };

        let left = range.sub_range(true);
        let right = range.sub_range(false);
        match range.image_state() {
            ImageState::Unknown | ImageState::OnlyBackground | ImageState::Invalid => {}
            ImageState::OnlyLeftEdgeVisible => {
                partial_edge(&mut info, left, right.appearance);
                info.left_edge = self.last_result.left_edge.line;
            }
            ImageState::OnlyRightEdgeVisible => {
                partial_edge(&mut info, right, left.appearance);
                info.right_edge = self.last_result.right_edge.line;
            }
            ImageState::FullEdgeVisible => {
                info.start_valid_range_y = left.start_valid_range_y.max(right.start_valid_range_y);
                info.end_valid_range_y = left.end_valid_range_y.min(right.end_valid_range_y);
                info.is_cropped = true;
                info.is_top_dark = left.appearance == Appearance::BackgroundOnTop;
                info.is_bottom_dark = left.appearance == Appearance::BackgroundOnBottom;
                info.is_top_material = !info.is_top_dark;
                info.is_bottom_material = !info.is_bottom_dark;
                let (border_left, border_right) = (left.border_stripe_y(), right.border_stripe_y());
                info.border_bg_stripe_y = if info.is_top_dark {
                    border_left.min(border_right)
                } else {
                    border_left.max(border_right)
                };
                apply_offset(&mut info);
                info.left_edge = self.last_result.left_edge.line;
                info.right_edge = self.last_result.right_edge.line;
            }
            ImageState::OnlyMaterial => {
                info.start_valid_range_y = if left.start_valid_range_y == -1 {
                    right.start_valid_range_y
                } else {
                    left.start_valid_range_y
                };
                let end = if left.end_valid_range_y == -1 {
                    right.end_valid_range_y
                } else {
                    left.end_valid_range_y
                };
                // ranges stop one row short of the last image row
                info.end_valid_range_y = end + 1;
                info.is_top_dark = false;
                info.is_bottom_dark = false;
                info.is_top_material = true;
                info.is_bottom_material = true;
                info.is_cropped = false;
            }
        }
        info
    }

    fn search_index(&self, left: bool) -> usize {
        if left || self.stripe_searches.len() == 1 {
            0
        } else {
            1
        }
    }

    /// Stripe labels of the last image for one side.
    pub fn stripes(&self, left: bool) -> &[StripeEvaluation] {
        self.stripe_searches
            .get(self.search_index(left))
            .map(|search| search.stripes.as_slice())
            .unwrap_or(&[])
    }

    /// Stripe layout of the last image for one side.
    pub fn stripe_positioning(&self, left: bool) -> Option<&StripePositioning> {
        self.stripe_searches
            .get(self.search_index(left))
            .map(|search| &search.positioning)
    }

    /// Edge samples of the last image for one side.
    pub fn last_edge_points(&self, left: bool) -> &[Point2<i32>] {
        &self.edge_areas[if left { 0 } else { 1 }].points
    }

    /// Columns `(x, width)` the edge of one side was refined in.
    pub fn edge_search_region(&self, left: bool) -> (i32, i32) {
        let area = &self.edge_areas[if left { 0 } else { 1 }];
        (area.x, area.width)
    }
}
