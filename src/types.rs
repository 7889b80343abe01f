//! Plain data shared by the per-image detector and the seam engine.
//!
//! Everything here is `Copy` and serializable so that per-image results can
//! be dumped by the tools without conversion.
use serde::{Deserialize, Serialize};

/// Straight line `y = m·x + q` in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedLine {
    pub m: f64,
    pub q: f64,
}

impl FittedLine {
    /// Placeholder stored for sides without a visible edge.
    pub const UNSET: FittedLine = FittedLine { m: 0.0, q: -1.0 };

    pub fn new(m: f64, q: f64) -> Self {
        Self { m, q }
    }

    pub fn horizontal(y: f64) -> Self {
        Self { m: 0.0, q: y }
    }

    #[inline]
    pub fn y(&self, x: f64) -> f64 {
        self.m * x + self.q
    }

    /// Move the line into a frame where every point `(x, y)` becomes
    /// `(x + dx, y + dy)`, e.g. from ROI into image coordinates.
    pub fn apply_translation(&mut self, dx: f64, dy: f64) {
        self.q += dy - self.m * dx;
    }

    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.apply_translation(dx, dy);
        self
    }
}

impl Default for FittedLine {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Content of one vertical search region of one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    #[default]
    Unknown,
    AllBackground,
    BackgroundOnTop,
    BackgroundOnBottom,
    AllMaterial,
    Unsupported,
    NotAvailable,
}

impl Appearance {
    /// True for the two variants that carry a material/background transition.
    #[inline]
    pub fn is_edge(self) -> bool {
        matches!(self, Self::BackgroundOnTop | Self::BackgroundOnBottom)
    }

    /// Regions that can sit next to a single visible edge.
    #[inline]
    pub fn is_uniform(self) -> bool {
        matches!(
            self,
            Self::AllBackground | Self::AllMaterial | Self::NotAvailable
        )
    }
}

/// Combined classification of the left and right regions of one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageState {
    OnlyBackground,
    OnlyMaterial,
    OnlyLeftEdgeVisible,
    OnlyRightEdgeVisible,
    FullEdgeVisible,
    Invalid,
    #[default]
    Unknown,
}

impl ImageState {
    pub fn is_edge_visible(self) -> bool {
        matches!(
            self,
            Self::OnlyLeftEdgeVisible | Self::OnlyRightEdgeVisible | Self::FullEdgeVisible
        )
    }
}

/// Meaning of an image relative to the progress of the seam.
///
/// Variants are declared in the order they occur along a regular seam, so the
/// derived ordering can be used to check progression.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ImageStateEvaluation {
    #[default]
    Unknown,
    BackgroundBeforeStart,
    StartEdge,
    PartialStartEdgeIgnored,
    OnlyMaterial,
    EndEdge,
    PartialEndEdgeIgnored,
    BackgroundAfterEnd,
}

/// Where an image sits in the seam and in sensor coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputImageContext {
    pub image_counter: i32,
    pub image_position_mm: f64,
    pub pixel_to_mm: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    pub sensor_image_height: i32,
}

impl Default for InputImageContext {
    fn default() -> Self {
        Self {
            image_counter: -1,
            image_position_mm: 0.0,
            pixel_to_mm: 1.0,
            offset_x: 0,
            offset_y: 0,
            sensor_image_height: 0,
        }
    }
}

/// Edge found in one search region, in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePositionInImage {
    pub appearance: Appearance,
    pub line: FittedLine,
}

impl EdgePositionInImage {
    pub fn new(appearance: Appearance, line: FittedLine) -> Self {
        Self { appearance, line }
    }

    #[inline]
    pub fn valid(&self) -> bool {
        self.appearance.is_edge()
    }
}

/// Per-image output consumed by ROI-cropping stages downstream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEndInfo {
    pub image_state: ImageState,
    pub image_state_evaluation: ImageStateEvaluation,
    pub is_top_dark: bool,
    pub is_bottom_dark: bool,
    pub is_top_material: bool,
    pub is_bottom_material: bool,
    pub is_cropped: bool,
    /// First usable row (inclusive), -1 if none.
    pub start_valid_range_y: i32,
    /// Last usable row (inclusive), -1 if none.
    pub end_valid_range_y: i32,
    /// Centre row of the background stripe bordering the material, -1 if none.
    pub border_bg_stripe_y: i32,
    pub left_edge: FittedLine,
    pub right_edge: FittedLine,
    pub image_width: i32,
    pub thresh_background: i32,
    pub thresh_material: i32,
}

impl Default for StartEndInfo {
    fn default() -> Self {
        Self {
            image_state: ImageState::Unknown,
            image_state_evaluation: ImageStateEvaluation::Unknown,
            is_top_dark: true,
            is_bottom_dark: true,
            is_top_material: false,
            is_bottom_material: false,
            is_cropped: true,
            start_valid_range_y: -1,
            end_valid_range_y: -1,
            border_bg_stripe_y: -1,
            left_edge: FittedLine::UNSET,
            right_edge: FittedLine::UNSET,
            image_width: 0,
            thresh_background: 0,
            thresh_material: 0,
        }
    }
}
