//! Usable image area derived from a [`StartEndInfo`].

use crate::types::StartEndInfo;
use serde::Serialize;

/// Axis-aligned rectangle in image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoiRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoiRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Rows of the image usable for seam inspection, minus `offset_left_right`
/// columns on both sides.
///
/// Offsets wider than half the image are ignored. Cropped images without a
/// valid row range give an empty rectangle.
pub fn compute_valid_roi(width: i32, height: i32, info: &StartEndInfo, offset_left_right: i32) -> RoiRect {
    let offset = if offset_left_right > width / 2 {
        0
    } else {
        offset_left_right
    };
    if !info.is_cropped {
        return RoiRect::new(offset, 0, width - 2 * offset, height);
    }
    if info.start_valid_range_y == -1 || info.end_valid_range_y == -1 {
        return RoiRect::default();
    }
    RoiRect::new(
        offset,
        info.start_valid_range_y,
        width + 1 - 2 * offset,
        info.end_valid_range_y - info.start_valid_range_y + 1,
    )
}
