//! Combination of the left and right region ranges into an image state.

use crate::stripes::RoiValidRange;
use crate::types::{Appearance, ImageState};

/// Valid ranges of both search regions and the resulting [`ImageState`].
#[derive(Clone, Debug, PartialEq)]
pub struct ImageValidRange {
    left: RoiValidRange,
    right: RoiValidRange,
    image_state: ImageState,
}

impl Default for ImageValidRange {
    fn default() -> Self {
        Self::new(RoiValidRange::default(), RoiValidRange::default())
    }
}

impl ImageValidRange {
    pub fn new(left: RoiValidRange, right: RoiValidRange) -> Self {
        let image_state = compute_image_state(left.appearance, right.appearance);
        Self {
            left,
            right,
            image_state,
        }
    }

    #[inline]
    pub fn image_state(&self) -> ImageState {
        self.image_state
    }

    pub fn sub_range(&self, left: bool) -> &RoiValidRange {
        if left {
            &self.left
        } else {
            &self.right
        }
    }

    /// Replace the left range; the image state is kept.
    pub fn set_left(&mut self, range: RoiValidRange) {
        self.left = range;
    }

    /// Replace the right range; the image state is kept.
    pub fn set_right(&mut self, range: RoiValidRange) {
        self.right = range;
    }

    pub fn is_edge_visible(&self) -> bool {
        self.image_state.is_edge_visible()
    }

    pub fn has_background_on_top(&self) -> bool {
        self.is_edge_visible()
            && (self.left.appearance == Appearance::BackgroundOnTop
                || self.right.appearance == Appearance::BackgroundOnTop)
    }

    pub fn has_background_on_bottom(&self) -> bool {
        self.is_edge_visible()
            && (self.left.appearance == Appearance::BackgroundOnBottom
                || self.right.appearance == Appearance::BackgroundOnBottom)
    }
}

/// Image state from the appearances of the two search regions.
pub fn compute_image_state(left: Appearance, right: Appearance) -> ImageState {
    let both = [left, right];
    if both.contains(&Appearance::Unsupported) {
        return ImageState::Invalid;
    }
    if both.contains(&Appearance::Unknown) {
        return ImageState::Unknown;
    }

    if left == right {
        return match left {
            Appearance::AllBackground => ImageState::OnlyBackground,
            Appearance::AllMaterial => ImageState::OnlyMaterial,
            Appearance::BackgroundOnTop | Appearance::BackgroundOnBottom => {
                ImageState::FullEdgeVisible
            }
            // two disabled sides
            Appearance::NotAvailable | Appearance::Unknown | Appearance::Unsupported => {
                ImageState::Invalid
            }
        };
    }

    if left.is_edge() && right.is_uniform() {
        return ImageState::OnlyLeftEdgeVisible;
    }
    if right.is_edge() && left.is_uniform() {
        return ImageState::OnlyRightEdgeVisible;
    }
    if left == Appearance::NotAvailable || right == Appearance::NotAvailable {
        let other = if right == Appearance::NotAvailable {
            left
        } else {
            right
        };
        match other {
            Appearance::AllBackground => return ImageState::OnlyBackground,
            Appearance::AllMaterial => return ImageState::OnlyMaterial,
            _ => {}
        }
    }
    ImageState::Invalid
}
