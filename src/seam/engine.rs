//! Seam-level start/end tracking across an image sequence.

use super::config::{Direction, SearchForEdges, SeamConfig};
use super::misalignment::{EdgeMisalignment, EdgePositionInSeam};
use super::position::SeamPositionInfo;
use super::state::{EdgeKind, EdgeSide, SeamState, WaitingForEdge};
use crate::detector::{DetectionParams, EdgeSearch, StartEndDetectionInImage};
use crate::error::DetectionError;
use crate::image::ImageU8;
use crate::stripes::{StripeClip, StripeEvaluation};
use crate::types::{
    Appearance, EdgePositionInImage, ImageState, ImageStateEvaluation, InputImageContext,
    StartEndInfo,
};
use log::{debug, warn};
use nalgebra::Point2;
use std::fmt::Write as _;

/// Everything [`StartEndDetectionInSeam::reset_state`] clears.
#[derive(Clone, Debug, Default)]
struct SeamProgress {
    seam_state: SeamState,
    /// Indexed by [`slot`].
    edges: [EdgePositionInSeam; 4],
    transition_from_background: Option<f64>,
    transition_from_full_image: Option<f64>,
    last_context: InputImageContext,
    last_evaluation: ImageStateEvaluation,
    assume_full_image: bool,
}

#[inline]
fn slot(kind: EdgeKind, side: EdgeSide) -> usize {
    match (kind, side) {
        (EdgeKind::Start, EdgeSide::Left) => 0,
        (EdgeKind::Start, EdgeSide::Right) => 1,
        (EdgeKind::End, EdgeSide::Left) => 2,
        (EdgeKind::End, EdgeSide::Right) => 3,
    }
}

impl SeamProgress {
    fn edge(&self, kind: EdgeKind, side: EdgeSide) -> &EdgePositionInSeam {
        &self.edges[slot(kind, side)]
    }

    fn pair(&self, kind: EdgeKind) -> EdgeMisalignment {
        EdgeMisalignment::new(*self.edge(kind, EdgeSide::Left), *self.edge(kind, EdgeSide::Right))
    }

    /// Both sides hold an edge or are switched off.
    fn edges_found(&self, kind: EdgeKind) -> bool {
        [EdgeSide::Left, EdgeSide::Right].into_iter().all(|side| {
            let edge = self.edge(kind, side);
            edge.found() || edge.position.appearance == Appearance::NotAvailable
        })
    }

    /// Exactly one side holds an edge.
    fn one_edge_found(&self, kind: EdgeKind) -> bool {
        self.edge(kind, EdgeSide::Left).found() != self.edge(kind, EdgeSide::Right).found()
    }
}

/// Tracks the start and end edges of a seam over the images of one scan.
///
/// Feed every image of the seam to [`process`](Self::process) in acquisition
/// order, then query the state, the stored edges and the transitions. Results
/// are sticky: once both edges of a kind are stored they are kept until
/// [`reset_state`](Self::reset_state), and each transition is recorded once.
///
/// Configuration (direction, searched edges, detection parameters) is kept by
/// `reset_state`; only the progress through the seam is cleared.
#[derive(Clone, Debug)]
pub struct StartEndDetectionInSeam {
    config: SeamConfig,
    detector: StartEndDetectionInImage,
    progress: SeamProgress,
}

impl Default for StartEndDetectionInSeam {
    fn default() -> Self {
        Self::new(SeamConfig::default(), DetectionParams::default())
    }
}

impl StartEndDetectionInSeam {
    pub fn new(config: SeamConfig, detection: DetectionParams) -> Self {
        Self {
            config,
            detector: StartEndDetectionInImage::new(detection),
            progress: SeamProgress::default(),
        }
    }

    pub fn config(&self) -> &SeamConfig {
        &self.config
    }

    pub fn detection_params(&self) -> &DetectionParams {
        self.detector.params()
    }

    /// Per-image detector holding the stripes and edges of the last image.
    pub fn detector(&self) -> &StartEndDetectionInImage {
        &self.detector
    }

    /// Process the next image of the seam.
    ///
    /// A buffer that is not a readable image is rejected and leaves the
    /// engine untouched.
    pub fn process(
        &mut self,
        image: &ImageU8<'_>,
        context: InputImageContext,
    ) -> Result<(), DetectionError> {
        image.validate()?;
        self.progress.last_context = context;
        if self.progress.assume_full_image {
            self.detector.process_as_full_image(image.w, image.h);
        } else {
            let search = self.next_edge_search();
            self.detector
                .process(image, search, self.config.min_stripes_material)?;
        }

        let previous = self.progress.seam_state;
        let evaluation = self.process_result(&context, image.h as i32);
        self.progress.last_evaluation = evaluation;

        if previous != self.progress.seam_state {
            debug!(
                "image {}: seam state {} -> {} ({:?})",
                context.image_counter, previous, self.progress.seam_state, evaluation
            );
        } else {
            debug!(
                "image {}: seam state {} ({:?})",
                context.image_counter, previous, evaluation
            );
        }
        if !self.is_seam_state_consistent() {
            warn!(
                "image {}: stored edges do not match seam state {}",
                context.image_counter, self.progress.seam_state
            );
        }
        Ok(())
    }

    /// [`process`](Self::process) with the context given field by field.
    #[allow(clippy::too_many_arguments)]
    pub fn process_with(
        &mut self,
        image: &ImageU8<'_>,
        image_counter: i32,
        image_position_mm: f64,
        pixel_to_mm: f64,
        offset_x: i32,
        offset_y: i32,
        sensor_image_height: i32,
    ) -> Result<(), DetectionError> {
        self.process(
            image,
            InputImageContext {
                image_counter,
                image_position_mm,
                pixel_to_mm,
                offset_x,
                offset_y,
                sensor_image_height,
            },
        )
    }

    /// Edge the engine expects next.
    pub fn waiting_for_edge(&self) -> WaitingForEdge {
        self.progress
            .seam_state
            .waiting_for_edge(self.config.search_for_edges)
    }

    /// Orientation filter for the next image.
    pub fn next_edge_search(&self) -> EdgeSearch {
        use Direction::*;
        match (self.waiting_for_edge(), self.config.direction) {
            (WaitingForEdge::Start, FromBelow) | (WaitingForEdge::End, FromAbove) => {
                EdgeSearch::OnlyBackgroundOnBottom
            }
            (WaitingForEdge::Start, FromAbove) | (WaitingForEdge::End, FromBelow) => {
                EdgeSearch::OnlyBackgroundOnTop
            }
            _ => EdgeSearch::BothDirections,
        }
    }

    fn process_result(&mut self, context: &InputImageContext, image_height: i32) -> ImageStateEvaluation {
        let result = self.detector.last_result();
        let image_state = result.valid_range.image_state();
        let (left_edge, right_edge) = (result.left_edge, result.right_edge);
        let search = self.config.search_for_edges;
        let position = context.image_position_mm;

        match image_state {
            ImageState::OnlyBackground => {
                self.progress.seam_state = self.progress.seam_state.after_only_background(search);
                match self.waiting_for_edge() {
                    WaitingForEdge::Start => ImageStateEvaluation::BackgroundBeforeStart,
                    WaitingForEdge::None => {
                        // the material must have been entered for it to end
                        if self.progress.seam_state != SeamState::Invalid
                            && self.progress.transition_from_background.is_some()
                        {
                            self.progress.transition_from_full_image.get_or_insert(position);
                        }
                        ImageStateEvaluation::BackgroundAfterEnd
                    }
                    WaitingForEdge::End => {
                        if search == SearchForEdges::OnlyEnd {
                            ImageStateEvaluation::BackgroundBeforeStart
                        } else {
                            ImageStateEvaluation::Unknown
                        }
                    }
                }
            }
            ImageState::OnlyMaterial => {
                for (side, edge) in [(EdgeSide::Left, left_edge), (EdgeSide::Right, right_edge)] {
                    if edge.appearance == Appearance::NotAvailable {
                        self.progress.edges[slot(EdgeKind::Start, side)]
                            .position
                            .appearance = Appearance::NotAvailable;
                    }
                }
                let params = self.detector.params();
                let both_sides = params.search_width_left != 0 && params.search_width_right != 0;
                self.progress.seam_state = self
                    .progress
                    .seam_state
                    .after_only_material(search, both_sides);
                if self.progress.seam_state != SeamState::Invalid {
                    self.progress.transition_from_background.get_or_insert(position);
                }
                ImageStateEvaluation::OnlyMaterial
            }
            ImageState::OnlyLeftEdgeVisible => {
                self.accept_one_edge(EdgeSide::Left, left_edge, context, image_height)
            }
            ImageState::OnlyRightEdgeVisible => {
                self.accept_one_edge(EdgeSide::Right, right_edge, context, image_height)
            }
            ImageState::FullEdgeVisible => self.accept_full_edge(left_edge, right_edge, context),
            ImageState::Invalid => {
                // a start edge shows up as invalid while only end edges are searched
                if self.progress.seam_state == SeamState::Unknown && search == SearchForEdges::OnlyEnd {
                    self.progress.seam_state = SeamState::WaitingFirstEndEdge;
                }
                if self.progress.seam_state != SeamState::WaitingFirstEndEdge {
                    self.progress.seam_state = SeamState::Invalid;
                }
                ImageStateEvaluation::Unknown
            }
            ImageState::Unknown => {
                self.progress.seam_state = SeamState::Invalid;
                ImageStateEvaluation::Unknown
            }
        }
    }

    fn accept_one_edge(
        &mut self,
        side: EdgeSide,
        edge: EdgePositionInImage,
        context: &InputImageContext,
        image_height: i32,
    ) -> ImageStateEvaluation {
        let state = self.progress.seam_state;
        let always_accept = self.config.always_accept_partial_edges;
        if !always_accept && self.is_near_image_border(side, &edge, image_height) {
            debug!(
                "image {}: partial {:?} edge at the image border ignored",
                context.image_counter, side
            );
            return match self.waiting_for_edge() {
                WaitingForEdge::Start => ImageStateEvaluation::PartialStartEdgeIgnored,
                WaitingForEdge::End => ImageStateEvaluation::PartialEndEdgeIgnored,
                WaitingForEdge::None => ImageStateEvaluation::Unknown,
            };
        }

        let (next, kind) = state.after_one_edge(
            self.progress.edge(EdgeKind::Start, side).found(),
            self.progress.edge(EdgeKind::End, side).found(),
            always_accept,
        );
        self.progress.seam_state = next;
        let Some(kind) = kind else {
            return match next {
                SeamState::FullStartEdgeFound => ImageStateEvaluation::PartialStartEdgeIgnored,
                SeamState::FullEndEdgeFound | SeamState::FullEndEdgeFoundStartMissing => {
                    ImageStateEvaluation::PartialEndEdgeIgnored
                }
                _ => ImageStateEvaluation::Unknown,
            };
        };

        self.store_edges(kind, &[(side, edge)], context);
        match kind {
            EdgeKind::Start => {
                // a single start edge does not start the seam yet
                if next != SeamState::FirstStartEdgeFound {
                    self.progress
                        .transition_from_background
                        .get_or_insert(context.image_position_mm);
                }
                ImageStateEvaluation::StartEdge
            }
            EdgeKind::End => {
                self.progress
                    .transition_from_full_image
                    .get_or_insert(context.image_position_mm);
                ImageStateEvaluation::EndEdge
            }
        }
    }

    fn accept_full_edge(
        &mut self,
        left: EdgePositionInImage,
        right: EdgePositionInImage,
        context: &InputImageContext,
    ) -> ImageStateEvaluation {
        let (next, kind) = self.progress.seam_state.after_full_edge();
        self.progress.seam_state = next;
        let Some(kind) = kind else {
            return ImageStateEvaluation::Unknown;
        };
        self.store_edges(kind, &[(EdgeSide::Left, left), (EdgeSide::Right, right)], context);
        match kind {
            EdgeKind::Start => {
                self.progress
                    .transition_from_background
                    .get_or_insert(context.image_position_mm);
                ImageStateEvaluation::StartEdge
            }
            EdgeKind::End => {
                self.progress
                    .transition_from_full_image
                    .get_or_insert(context.image_position_mm);
                ImageStateEvaluation::EndEdge
            }
        }
    }

    /// Store edges of one kind unless both sides are already known.
    fn store_edges(
        &mut self,
        kind: EdgeKind,
        edges: &[(EdgeSide, EdgePositionInImage)],
        context: &InputImageContext,
    ) {
        let left = self.progress.edge(kind, EdgeSide::Left).found();
        let right = self.progress.edge(kind, EdgeSide::Right).found();
        if left && right {
            return;
        }
        for &(side, edge) in edges {
            let from_below = self.is_from_below(kind, edge.appearance);
            self.progress.edges[slot(kind, side)] = EdgePositionInSeam::new(edge, context, from_below);
        }
    }

    fn is_from_below(&self, kind: EdgeKind, appearance: Appearance) -> bool {
        match self.config.direction {
            Direction::FromAbove => false,
            Direction::FromBelow => true,
            Direction::Unknown => match kind {
                EdgeKind::Start => appearance == Appearance::BackgroundOnBottom,
                EdgeKind::End => appearance == Appearance::BackgroundOnTop,
            },
        }
    }

    fn is_near_image_border(&self, side: EdgeSide, edge: &EdgePositionInImage, image_height: i32) -> bool {
        let tolerance = self.config.partial_edge_border_tolerance;
        if tolerance <= 0 {
            return false;
        }
        let (x, width) = self.detector.edge_search_region(side.is_left());
        let y = edge.line.y(f64::from(x) + f64::from(width) / 2.0);
        y <= f64::from(tolerance) || y >= f64::from(image_height - 1 - tolerance)
    }

    /// Left and right edges of one kind as stored so far.
    ///
    /// The pair is only [`found`](EdgeMisalignment::found) once both sides
    /// hold an edge; after that it does not change until reset.
    pub fn compute_edge_misalignment(&self, is_start: bool) -> EdgeMisalignment {
        self.progress.pair(if is_start { EdgeKind::Start } else { EdgeKind::End })
    }

    pub fn start_edges_found(&self) -> bool {
        self.progress.edges_found(EdgeKind::Start)
    }

    pub fn end_edges_found(&self) -> bool {
        self.progress.edges_found(EdgeKind::End)
    }

    /// Check the stored edges and transitions against the seam state.
    pub fn is_seam_state_consistent(&self) -> bool {
        use SeamState::*;
        let p = &self.progress;
        if p.transition_from_full_image.is_some() && p.transition_from_background.is_none() {
            return p.seam_state == Invalid;
        }
        let start = self.start_edges_found();
        let end = self.end_edges_found();
        match p.seam_state {
            Unknown | Invalid => true,
            WaitingFirstStartEdge
            | WaitingFirstEndEdge
            | FullImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing => !start && !end,
            FirstStartEdgeFound => p.one_edge_found(EdgeKind::Start) && !end,
            SecondStartEdgeFound | FullStartEdgeFound | FullStartEdgeFoundEndMissing
            | FullImageFound => start && !end,
            // reached from both FirstEndEdgeFound and its StartMissing twin
            EndBackgroundImageFoundEndMissing => !end,
            FirstEndEdgeFound => start && p.one_edge_found(EdgeKind::End),
            FirstEndEdgeFoundStartMissing => !start && p.one_edge_found(EdgeKind::End),
            SecondEndEdgeFound | FullEndEdgeFound | EndBackgroundImageFound => start && end,
            SecondEndEdgeFoundStartMissing
            | FullEndEdgeFoundStartMissing
            | EndBackgroundImageFoundStartMissing => !start && end,
        }
    }

    pub fn seam_state(&self) -> SeamState {
        self.progress.seam_state
    }

    /// Seam position where the material starts, -1 when not seen yet.
    pub fn transition_from_background(&self) -> f64 {
        self.progress.transition_from_background.unwrap_or(-1.0)
    }

    /// Seam position where the material ends, -1 when not seen yet.
    pub fn transition_from_full_image(&self) -> f64 {
        self.progress.transition_from_full_image.unwrap_or(-1.0)
    }

    pub fn last_image_evaluation(&self) -> ImageStateEvaluation {
        self.progress.last_evaluation
    }

    pub fn last_image_context(&self) -> &InputImageContext {
        &self.progress.last_context
    }

    /// Usable rows of the last image together with its evaluation.
    pub fn last_image_start_end_info(&self, offset: i32) -> StartEndInfo {
        StartEndInfo {
            image_state_evaluation: self.progress.last_evaluation,
            ..self.detector.last_image_start_end_info(offset)
        }
    }

    pub fn left_edge_in_last_image(&self) -> EdgePositionInImage {
        self.detector.last_result().left_edge
    }

    pub fn right_edge_in_last_image(&self) -> EdgePositionInImage {
        self.detector.last_result().right_edge
    }

    /// Stripe centres of the last image with their tube label.
    pub fn stripes_result_in_last_image(&self, left: bool) -> Vec<(Point2<f64>, bool)> {
        let Some(positioning) = self.detector.stripe_positioning(left) else {
            return Vec::new();
        };
        self.detector
            .stripes(left)
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let center = positioning.stripe_coordinate_in_image(index as i32, StripeClip::NoClip);
                (center, *label == StripeEvaluation::Tube)
            })
            .collect()
    }

    pub fn edge_points_in_last_image(&self, left: bool) -> &[Point2<i32>] {
        self.detector.last_edge_points(left)
    }

    /// One-line description of the engine for logs.
    pub fn state_summary(&self) -> String {
        let mut out = format!(
            "Direction: {:?} Last Image ({}): ",
            self.config.direction, self.progress.last_context.image_counter
        );
        if self.detector.has_edge() {
            out.push_str("edge visible ");
        }
        let _ = write!(
            out,
            "{:?} SeamState: {} Next valid edge: ",
            self.progress.last_evaluation, self.progress.seam_state
        );
        let _ = match self.waiting_for_edge() {
            WaitingForEdge::Start => write!(out, "start (search {:?})", self.next_edge_search()),
            WaitingForEdge::End => write!(out, "end (search {:?})", self.next_edge_search()),
            WaitingForEdge::None => write!(out, "none"),
        };
        out
    }

    /// Images in the middle of the seam are taken as full material unseen.
    pub fn update_on_seam_position_info(&mut self, info: SeamPositionInfo) {
        self.progress.assume_full_image = info == SeamPositionInfo::Middle;
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.config.direction = direction;
    }

    /// Set the searched edges from the integer parameter (1 start, 2 end, else both).
    pub fn update_search_for_edges(&mut self, value: i32) {
        self.config.search_for_edges = SearchForEdges::from_parameter(value);
    }

    pub fn search_for_edges(&self) -> SearchForEdges {
        self.config.search_for_edges
    }

    /// Set the stripe thresholds; edge refinement uses their mean.
    pub fn update_thresholds(&mut self, thresh_material: i32, thresh_background: i32) {
        let params = self.detector.params_mut();
        params.stripe.threshold_material = thresh_material;
        params.stripe.threshold_background = thresh_background;
        params.thresh_material_for_edge_recognition = (thresh_background + thresh_material) / 2;
    }

    /// Set the expected edge angle in degrees.
    pub fn update_edge_angle(&mut self, degrees: f64) {
        self.detector.params_mut().inclination = if degrees == 0.0 {
            0.0
        } else {
            degrees.to_radians().tan()
        };
    }

    pub fn update_offset_left_right(&mut self, offset: i32) {
        self.detector.params_mut().offset_left_right = offset;
    }

    pub fn update_min_stripes_material(&mut self, min_stripes: usize) {
        self.config.min_stripes_material = min_stripes;
    }

    pub fn set_always_accept_partial_edges(&mut self, accept: bool) {
        self.config.always_accept_partial_edges = accept;
    }

    pub fn set_partial_edge_border_tolerance(&mut self, rows: i32) {
        self.config.partial_edge_border_tolerance = rows;
    }

    /// Replace the per-image detection parameters.
    pub fn set_detection_params(&mut self, params: DetectionParams) {
        *self.detector.params_mut() = params;
    }

    /// Forget the seam progress, keeping the configuration.
    pub fn reset_state(&mut self) {
        self.progress = SeamProgress::default();
        self.detector.reset_state();
    }
}
