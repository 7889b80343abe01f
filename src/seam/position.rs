//! Helpers that post-process the seam engine outputs.

use super::state::SeamState;
use log::warn;
use serde::{Deserialize, Serialize};

/// Rough location of an image within the seam, known from the trigger count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeamPositionInfo {
    #[default]
    Unknown,
    StartCandidate,
    Middle,
    EndCandidate,
}

/// Classify `image_number` given the expected number of triggers of the seam.
///
/// The first and last `images_at_border` images may contain an edge; the ones
/// in between are expected to show full material. Seams too short to have a
/// middle give `Unknown`.
pub fn seam_position_info(image_number: i32, num_triggers: i32, images_at_border: i32) -> SeamPositionInfo {
    let max_start = (images_at_border - 1).max(0);
    let min_end = num_triggers - images_at_border;
    if min_end <= max_start {
        return SeamPositionInfo::Unknown;
    }
    if image_number <= max_start {
        SeamPositionInfo::StartCandidate
    } else if image_number >= min_end {
        SeamPositionInfo::EndCandidate
    } else {
        SeamPositionInfo::Middle
    }
}

/// Length of the seam between the two transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeamLength {
    pub length_mm: f64,
    /// False while the end transition is still missing.
    pub valid: bool,
}

impl SeamLength {
    /// `start_mm` / `end_mm` are the transitions (-1 when unset), `current_mm`
    /// the position of the last image.
    pub fn compute(start_mm: f64, end_mm: f64, current_mm: f64) -> Self {
        match (start_mm >= 0.0, end_mm >= 0.0) {
            (true, true) => Self {
                length_mm: end_mm - start_mm,
                valid: true,
            },
            (true, false) => Self {
                length_mm: current_mm - start_mm,
                valid: false,
            },
            _ => Self::default(),
        }
    }
}

/// Quality of the edge pair reported in `state`: `(both_found, definitive)`.
///
/// `definitive` tells that no later image can change the answer. At the last
/// image of the seam (`is_seam_end`) every answer is definitive.
pub fn start_end_quality(state: SeamState, is_seam_end: bool) -> (bool, bool) {
    use SeamState::*;
    let (both_found, definitive) = match state {
        Unknown => (false, false),
        Invalid => (false, true),
        WaitingFirstStartEdge | WaitingFirstEndEdge | FirstStartEdgeFound | SecondStartEdgeFound
        | FullStartEdgeFound | FullImageFound | FirstEndEdgeFound => (false, false),
        FullImageFoundStartMissing | FullStartEdgeFoundEndMissing => (false, true),
        SecondEndEdgeFound | FullEndEdgeFound | EndBackgroundImageFound => (true, true),
        FirstEndEdgeFoundStartMissing
        | SecondEndEdgeFoundStartMissing
        | FullEndEdgeFoundStartMissing
        | EndBackgroundImageFoundStartMissing
        | EndBackgroundImageFoundStartEndMissing
        | EndBackgroundImageFoundEndMissing => (false, true),
    };
    (both_found, definitive || is_seam_end)
}

/// Clamp an 8-bit threshold parameter, falling back to 50 when out of range.
pub fn sanitize_threshold(value: i32) -> i32 {
    if (0..=255).contains(&value) {
        value
    } else {
        warn!("threshold {value} outside 0..=255, using 50");
        50
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn position_info_splits_seam_in_three() {
        assert_eq!(seam_position_info(0, 20, 3), SeamPositionInfo::StartCandidate);
        assert_eq!(seam_position_info(2, 20, 3), SeamPositionInfo::StartCandidate);
        assert_eq!(seam_position_info(3, 20, 3), SeamPositionInfo::Middle);
        assert_eq!(seam_position_info(16, 20, 3), SeamPositionInfo::Middle);
        assert_eq!(seam_position_info(17, 20, 3), SeamPositionInfo::EndCandidate);
        assert_eq!(seam_position_info(5, 4, 3), SeamPositionInfo::Unknown);
    }

    #[test]
    fn seam_length_needs_start() {
        let full = SeamLength::compute(2.0, 12.5, 20.0);
        assert!(full.valid);
        assert_relative_eq!(full.length_mm, 10.5);
        let running = SeamLength::compute(2.0, -1.0, 7.0);
        assert!(!running.valid);
        assert_relative_eq!(running.length_mm, 5.0);
        assert_eq!(SeamLength::compute(-1.0, -1.0, 7.0), SeamLength::default());
    }

    #[test]
    fn quality_is_definitive_at_seam_end() {
        assert_eq!(start_end_quality(SeamState::EndBackgroundImageFound, false), (true, true));
        assert_eq!(start_end_quality(SeamState::FullImageFound, false), (false, false));
        assert_eq!(start_end_quality(SeamState::FullImageFound, true), (false, true));
        assert_eq!(start_end_quality(SeamState::Invalid, false), (false, true));
    }

    #[test]
    fn thresholds_outside_byte_range_fall_back() {
        assert_eq!(sanitize_threshold(0), 0);
        assert_eq!(sanitize_threshold(200), 200);
        assert_eq!(sanitize_threshold(-3), 50);
        assert_eq!(sanitize_threshold(300), 50);
    }
}
