use super::*;
use crate::detector::{DetectionParams, EdgeSearch};
use crate::error::DetectionError;
use crate::image::io::GrayImageU8;
use crate::image::ImageU8;
use crate::types::{Appearance, ImageState, ImageStateEvaluation, InputImageContext};
use approx::assert_relative_eq;

const BG: u8 = 20;
const MAT: u8 = 150;
const W: usize = 500;
const H: usize = 250;
const EDGE_X: usize = 200;
const TRIGGER_MM: f64 = 1.1;

/// Content of one half of a synthetic frame.
#[derive(Clone, Copy, Debug)]
enum Half {
    Background,
    Material,
    /// Material down to the given row (inclusive).
    BackgroundOnBottom(usize),
    /// Material from the given row down.
    BackgroundOnTop(usize),
}

impl Half {
    fn is_material(self, y: usize) -> bool {
        match self {
            Half::Background => false,
            Half::Material => true,
            Half::BackgroundOnBottom(edge) => y <= edge,
            Half::BackgroundOnTop(edge) => y >= edge,
        }
    }
}

fn frame(left: Half, right: Half) -> GrayImageU8 {
    let mut img = GrayImageU8::filled(W, H, BG);
    for y in 0..H {
        if left.is_material(y) {
            img.fill_row_span(y, 0, EDGE_X, MAT);
        }
        if right.is_material(y) {
            img.fill_row_span(y, EDGE_X, W, MAT);
        }
    }
    img
}

fn context(counter: i32) -> InputImageContext {
    InputImageContext {
        image_counter: counter,
        image_position_mm: TRIGGER_MM * f64::from(counter),
        pixel_to_mm: 1.0,
        offset_x: 0,
        offset_y: 0,
        sensor_image_height: 1024,
    }
}

fn from_below() -> StartEndDetectionInSeam {
    let mut seam = StartEndDetectionInSeam::default();
    seam.set_direction(Direction::FromBelow);
    seam
}

fn feed(seam: &mut StartEndDetectionInSeam, img: &GrayImageU8, counter: i32) -> ImageStateEvaluation {
    seam.process(&img.as_view(), context(counter)).unwrap();
    assert!(seam.is_seam_state_consistent(), "{}", seam.state_summary());
    seam.last_image_evaluation()
}

#[test]
fn integer_parameters_map_to_enums() {
    assert_eq!(Direction::from_parameter(0), Direction::FromBelow);
    assert_eq!(Direction::from_parameter(1), Direction::FromAbove);
    assert_eq!(Direction::from_parameter(7), Direction::Unknown);
    assert_eq!(SearchForEdges::from_parameter(1), SearchForEdges::OnlyStart);
    assert_eq!(SearchForEdges::from_parameter(2), SearchForEdges::OnlyEnd);
    assert_eq!(SearchForEdges::from_parameter(0), SearchForEdges::Both);
    assert_eq!(SearchForEdges::from_parameter(-4), SearchForEdges::Both);
}

#[test]
fn waiting_for_edge_follows_search() {
    use SeamState::*;
    assert_eq!(Unknown.waiting_for_edge(SearchForEdges::Both), WaitingForEdge::Start);
    assert_eq!(Unknown.waiting_for_edge(SearchForEdges::OnlyEnd), WaitingForEdge::End);
    assert_eq!(Invalid.waiting_for_edge(SearchForEdges::Both), WaitingForEdge::None);
    assert_eq!(FullImageFound.waiting_for_edge(SearchForEdges::Both), WaitingForEdge::End);
    assert_eq!(FullImageFound.waiting_for_edge(SearchForEdges::OnlyStart), WaitingForEdge::None);
    assert_eq!(
        FirstEndEdgeFoundStartMissing.waiting_for_edge(SearchForEdges::OnlyStart),
        WaitingForEdge::End
    );
    assert_eq!(FullStartEdgeFoundEndMissing.waiting_for_edge(SearchForEdges::Both), WaitingForEdge::None);
}

#[test]
fn background_transitions() {
    use SeamState::*;
    let both = SearchForEdges::Both;
    assert_eq!(Unknown.after_only_background(both), WaitingFirstStartEdge);
    assert_eq!(Unknown.after_only_background(SearchForEdges::OnlyEnd), WaitingFirstEndEdge);
    assert_eq!(FullImageFound.after_only_background(both), FullImageFound);
    assert_eq!(SecondEndEdgeFound.after_only_background(both), EndBackgroundImageFound);
    assert_eq!(FirstEndEdgeFound.after_only_background(both), EndBackgroundImageFoundEndMissing);
    assert_eq!(
        FullEndEdgeFoundStartMissing.after_only_background(both),
        EndBackgroundImageFoundStartMissing
    );
    assert_eq!(FirstStartEdgeFound.after_only_background(both), Invalid);
}

#[test]
fn material_transitions() {
    use SeamState::*;
    let both = SearchForEdges::Both;
    assert_eq!(WaitingFirstStartEdge.after_only_material(both, true), FullImageFoundStartMissing);
    assert_eq!(FirstStartEdgeFound.after_only_material(both, true), FullImageFoundStartMissing);
    assert_eq!(FirstStartEdgeFound.after_only_material(both, false), FullImageFound);
    assert_eq!(FullStartEdgeFound.after_only_material(both, true), FullImageFound);
    assert_eq!(
        FullStartEdgeFound.after_only_material(SearchForEdges::OnlyStart, true),
        FullStartEdgeFoundEndMissing
    );
    assert_eq!(FullEndEdgeFound.after_only_material(both, true), Invalid);
    assert_eq!(EndBackgroundImageFound.after_only_material(both, true), EndBackgroundImageFound);
}

#[test]
fn single_edge_transitions() {
    use SeamState::*;
    let start = Some(EdgeKind::Start);
    let end = Some(EdgeKind::End);
    assert_eq!(WaitingFirstStartEdge.after_one_edge(false, false, false), (FirstStartEdgeFound, start));
    assert_eq!(FirstStartEdgeFound.after_one_edge(false, false, false), (SecondStartEdgeFound, start));
    assert_eq!(FirstStartEdgeFound.after_one_edge(true, false, false), (FirstStartEdgeFound, start));
    assert_eq!(FullStartEdgeFound.after_one_edge(true, false, false), (FullStartEdgeFound, None));
    assert_eq!(FullStartEdgeFound.after_one_edge(true, false, true), (FullStartEdgeFound, start));
    assert_eq!(FullImageFound.after_one_edge(true, false, false), (FirstEndEdgeFound, end));
    assert_eq!(
        FullImageFoundStartMissing.after_one_edge(false, false, false),
        (FirstEndEdgeFoundStartMissing, end)
    );
    assert_eq!(
        FirstEndEdgeFoundStartMissing.after_one_edge(false, false, false),
        (SecondEndEdgeFoundStartMissing, end)
    );
    assert_eq!(FullEndEdgeFound.after_one_edge(true, true, false), (FullEndEdgeFound, None));
    assert_eq!(WaitingFirstEndEdge.after_one_edge(false, false, true), (WaitingFirstEndEdge, None));
    assert_eq!(
        FullStartEdgeFoundEndMissing.after_one_edge(true, false, true),
        (FullStartEdgeFoundEndMissing, None)
    );
}

#[test]
fn full_edge_transitions() {
    use SeamState::*;
    assert_eq!(Unknown.after_full_edge(), (FullStartEdgeFound, Some(EdgeKind::Start)));
    assert_eq!(SecondStartEdgeFound.after_full_edge(), (FullStartEdgeFound, Some(EdgeKind::Start)));
    assert_eq!(FullImageFound.after_full_edge(), (SecondEndEdgeFound, Some(EdgeKind::End)));
    assert_eq!(
        FullImageFoundStartMissing.after_full_edge(),
        (SecondEndEdgeFoundStartMissing, Some(EdgeKind::End))
    );
    assert_eq!(SecondEndEdgeFound.after_full_edge(), (FullEndEdgeFound, Some(EdgeKind::End)));
    assert_eq!(Invalid.after_full_edge(), (Invalid, None));
    assert_eq!(WaitingFirstEndEdge.after_full_edge(), (WaitingFirstEndEdge, None));
    assert_eq!(
        FullStartEdgeFoundEndMissing.after_full_edge(),
        (FullStartEdgeFoundEndMissing, None)
    );
}

#[test]
fn state_names_keep_missing_suffix() {
    assert_eq!(SeamState::FullStartEdgeFoundEndMissing.to_string(), "FullStartEdgeFound_EndMissing");
    assert_eq!(
        SeamState::EndBackgroundImageFoundStartEndMissing.to_string(),
        "EndBackgroundImageFound_StartEndMissing"
    );
    assert_eq!(SeamState::SecondStartEdgeFound.to_string(), "SecondStartEdgeFound");
}

#[test]
fn search_orientation_follows_direction() {
    let mut seam = StartEndDetectionInSeam::default();
    assert_eq!(seam.next_edge_search(), EdgeSearch::BothDirections);
    seam.set_direction(Direction::FromBelow);
    assert_eq!(seam.next_edge_search(), EdgeSearch::OnlyBackgroundOnBottom);
    seam.set_direction(Direction::FromAbove);
    assert_eq!(seam.next_edge_search(), EdgeSearch::OnlyBackgroundOnTop);
    seam.update_search_for_edges(2);
    assert_eq!(seam.waiting_for_edge(), WaitingForEdge::End);
    assert_eq!(seam.next_edge_search(), EdgeSearch::OnlyBackgroundOnBottom);
}

#[test]
fn unreadable_buffer_leaves_engine_untouched() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);
    let data = vec![0u8; 10];
    let truncated = ImageU8 {
        w: W,
        h: H,
        stride: W,
        data: &data,
    };
    let err = seam.process(&truncated, context(1)).unwrap_err();
    assert!(matches!(err, DetectionError::BufferTooSmall { .. }));
    assert_eq!(seam.seam_state(), SeamState::WaitingFirstStartEdge);
    assert_eq!(seam.last_image_context().image_counter, 0);
}

#[test]
fn background_before_start() {
    let mut seam = from_below();
    for counter in 0..2 {
        let evaluation = feed(&mut seam, &frame(Half::Background, Half::Background), counter);
        assert_eq!(evaluation, ImageStateEvaluation::BackgroundBeforeStart);
    }
    assert_eq!(seam.seam_state(), SeamState::WaitingFirstStartEdge);
    let info = seam.last_image_start_end_info(1);
    assert!(info.is_top_dark && info.is_bottom_dark);
    assert_eq!(info.image_state, ImageState::OnlyBackground);
    assert_relative_eq!(seam.transition_from_background(), -1.0);
    assert_relative_eq!(seam.transition_from_full_image(), -1.0);
}

#[test]
fn start_edges_from_two_images() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);

    let eval = feed(&mut seam, &frame(Half::BackgroundOnBottom(102), Half::Background), 1);
    assert_eq!(eval, ImageStateEvaluation::StartEdge);
    assert_eq!(seam.seam_state(), SeamState::FirstStartEdgeFound);
    assert!(!seam.start_edges_found());
    assert!(!seam.compute_edge_misalignment(true).found());
    assert_relative_eq!(seam.transition_from_background(), -1.0);

    let eval = feed(&mut seam, &frame(Half::Material, Half::BackgroundOnBottom(99)), 2);
    assert_eq!(eval, ImageStateEvaluation::StartEdge);
    assert_eq!(seam.seam_state(), SeamState::SecondStartEdgeFound);
    assert!(seam.start_edges_found());
    assert_relative_eq!(seam.transition_from_background(), 2.0 * TRIGGER_MM, epsilon = 1e-9);

    let pair = seam.compute_edge_misalignment(true);
    assert!(pair.found());
    assert_eq!(pair.left.image_number, 1);
    assert_eq!(pair.right.image_number, 2);
    assert_eq!(pair.appearance(), Appearance::BackgroundOnBottom);

    feed(&mut seam, &frame(Half::Material, Half::Material), 3);
    assert_eq!(seam.seam_state(), SeamState::FullImageFound);
    assert_relative_eq!(seam.transition_from_background(), 2.0 * TRIGGER_MM, epsilon = 1e-9);
}

#[test]
fn partial_edge_after_full_edge() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);
    let eval = feed(
        &mut seam,
        &frame(Half::BackgroundOnBottom(102), Half::BackgroundOnBottom(99)),
        1,
    );
    assert_eq!(eval, ImageStateEvaluation::StartEdge);
    assert_eq!(seam.seam_state(), SeamState::FullStartEdgeFound);
    let stored = seam.compute_edge_misalignment(true);
    let rows = stored.right.position.line.q - stored.left.position.line.q;
    assert_relative_eq!(rows, -3.0, epsilon = 1.0);
    // measured from the bottom border, so the higher right edge lies further along
    assert_relative_eq!(stored.misalignment_mm().unwrap(), -rows, epsilon = 1e-9);

    let partial = frame(Half::BackgroundOnBottom(120), Half::Material);
    let eval = feed(&mut seam, &partial, 2);
    assert_eq!(eval, ImageStateEvaluation::PartialStartEdgeIgnored);
    assert_eq!(seam.seam_state(), SeamState::FullStartEdgeFound);

    seam.set_always_accept_partial_edges(true);
    let eval = feed(&mut seam, &partial, 3);
    assert_eq!(eval, ImageStateEvaluation::StartEdge);
    // both start edges were already known
    assert_eq!(seam.compute_edge_misalignment(true), stored);
    assert_relative_eq!(seam.transition_from_background(), TRIGGER_MM);
}

#[test]
fn partial_edge_near_border_is_ignored() {
    let mut seam = from_below();
    seam.set_partial_edge_border_tolerance(40);
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);

    let near_bottom = frame(Half::BackgroundOnBottom(220), Half::Material);
    let eval = feed(&mut seam, &near_bottom, 1);
    assert_eq!(eval, ImageStateEvaluation::PartialStartEdgeIgnored);
    assert_eq!(seam.seam_state(), SeamState::WaitingFirstStartEdge);
    assert!(!seam.compute_edge_misalignment(true).left.found());

    seam.set_partial_edge_border_tolerance(0);
    let eval = feed(&mut seam, &near_bottom, 2);
    assert_eq!(eval, ImageStateEvaluation::StartEdge);
    assert_eq!(seam.seam_state(), SeamState::FirstStartEdgeFound);
    assert!(seam.compute_edge_misalignment(true).left.found());
}

#[test]
fn invalid_image_while_waiting_for_end() {
    let crossed = frame(Half::BackgroundOnTop(100), Half::BackgroundOnBottom(100));

    let mut seam = StartEndDetectionInSeam::default();
    feed(&mut seam, &crossed, 0);
    assert_eq!(seam.detector().last_result().valid_range.image_state(), ImageState::Invalid);
    assert_eq!(seam.seam_state(), SeamState::Invalid);

    let mut seam = StartEndDetectionInSeam::default();
    seam.update_search_for_edges(2);
    let eval = feed(&mut seam, &crossed, 0);
    assert_eq!(eval, ImageStateEvaluation::Unknown);
    assert_eq!(seam.seam_state(), SeamState::WaitingFirstEndEdge);
}

#[test]
fn middle_of_seam_is_taken_as_material() {
    let mut seam = from_below();
    seam.update_on_seam_position_info(SeamPositionInfo::Middle);
    let eval = feed(&mut seam, &frame(Half::Background, Half::Background), 5);
    assert_eq!(eval, ImageStateEvaluation::OnlyMaterial);
    assert_eq!(seam.seam_state(), SeamState::FullImageFoundStartMissing);
    let info = seam.last_image_start_end_info(0);
    assert!(!info.is_cropped);
    assert_eq!(info.start_valid_range_y, 0);
    assert_eq!(info.end_valid_range_y, H as i32 - 1);
    assert_relative_eq!(seam.transition_from_background(), 5.0 * TRIGGER_MM, epsilon = 1e-9);

    seam.update_on_seam_position_info(SeamPositionInfo::EndCandidate);
    let eval = feed(&mut seam, &frame(Half::Background, Half::Background), 6);
    assert_eq!(eval, ImageStateEvaluation::Unknown);
    assert_eq!(seam.seam_state(), SeamState::FullImageFoundStartMissing);
}

#[test]
fn reset_keeps_configuration() {
    let mut seam = from_below();
    seam.update_search_for_edges(1);
    seam.update_offset_left_right(5);
    seam.update_min_stripes_material(4);
    seam.update_on_seam_position_info(SeamPositionInfo::Middle);
    feed(&mut seam, &frame(Half::Material, Half::Material), 0);
    assert_ne!(seam.seam_state(), SeamState::Unknown);

    seam.reset_state();
    assert_eq!(seam.seam_state(), SeamState::Unknown);
    assert_eq!(seam.last_image_evaluation(), ImageStateEvaluation::Unknown);
    assert_relative_eq!(seam.transition_from_background(), -1.0);
    assert_eq!(seam.direction(), Direction::FromBelow);
    assert_eq!(seam.search_for_edges(), SearchForEdges::OnlyStart);
    assert_eq!(seam.detection_params().offset_left_right, 5);
    assert_eq!(seam.config().min_stripes_material, 4);

    // the full-image shortcut belongs to the progress
    let eval = feed(&mut seam, &frame(Half::Background, Half::Background), 1);
    assert_eq!(eval, ImageStateEvaluation::BackgroundBeforeStart);
}

#[test]
fn threshold_and_angle_setters() {
    let mut seam = StartEndDetectionInSeam::new(SeamConfig::default(), DetectionParams::default());
    seam.update_thresholds(120, 40);
    let params = seam.detection_params();
    assert_eq!(params.stripe.threshold_material, 120);
    assert_eq!(params.stripe.threshold_background, 40);
    assert_eq!(params.thresh_material_for_edge_recognition, 80);

    seam.update_edge_angle(45.0);
    assert_relative_eq!(seam.detection_params().inclination, 1.0, epsilon = 1e-12);
    seam.update_edge_angle(0.0);
    assert_eq!(seam.detection_params().inclination, 0.0);
}

#[test]
fn last_image_diagnostics() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::BackgroundOnBottom(102), Half::BackgroundOnBottom(99)), 0);

    let stripes = seam.stripes_result_in_last_image(true);
    assert_eq!(stripes.len(), H / 10);
    assert!(stripes[0].1);
    assert!(!stripes[stripes.len() - 1].1);
    assert_relative_eq!(stripes[0].0.x, 50.0);
    assert!(!seam.edge_points_in_last_image(false).is_empty());
    assert!(seam.left_edge_in_last_image().valid());
    assert!(seam.right_edge_in_last_image().valid());

    let summary = seam.state_summary();
    assert!(summary.contains("SeamState: FullStartEdgeFound"), "{summary}");
    assert!(summary.contains("edge visible"), "{summary}");
    assert!(summary.contains("start (search OnlyBackgroundOnBottom)"), "{summary}");
}

#[test]
fn invalid_seam_records_no_transitions() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);
    feed(
        &mut seam,
        &frame(Half::BackgroundOnBottom(102), Half::Background),
        1,
    );
    assert_eq!(seam.seam_state(), SeamState::FirstStartEdgeFound);

    // background right after a single start edge breaks the seam
    feed(&mut seam, &frame(Half::Background, Half::Background), 2);
    assert_eq!(seam.seam_state(), SeamState::Invalid);
    assert_eq!(seam.transition_from_full_image(), -1.0);

    assert_eq!(
        feed(&mut seam, &frame(Half::Material, Half::Material), 3),
        ImageStateEvaluation::OnlyMaterial
    );
    assert_eq!(seam.seam_state(), SeamState::Invalid);
    assert_eq!(seam.transition_from_background(), -1.0);
    assert_eq!(seam.transition_from_full_image(), -1.0);
}

#[test]
fn invalid_seam_keeps_recorded_start() {
    let mut seam = from_below();
    feed(&mut seam, &frame(Half::Background, Half::Background), 0);
    feed(
        &mut seam,
        &frame(Half::BackgroundOnBottom(102), Half::BackgroundOnBottom(99)),
        1,
    );
    assert_eq!(seam.transition_from_background(), TRIGGER_MM);

    feed(&mut seam, &frame(Half::Background, Half::Background), 2);
    assert_eq!(seam.seam_state(), SeamState::Invalid);
    feed(&mut seam, &frame(Half::Material, Half::Material), 3);
    feed(&mut seam, &frame(Half::Background, Half::Background), 4);
    assert_eq!(seam.transition_from_background(), TRIGGER_MM);
    assert_eq!(seam.transition_from_full_image(), -1.0);
    assert!(seam.compute_edge_misalignment(true).found());
}
