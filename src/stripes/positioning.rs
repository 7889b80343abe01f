//! Mapping between stripe indices and pixel coordinates.

use crate::types::FittedLine;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Stripe index; `-1` marks "no stripe".
pub type StripeIndex = i32;

/// Whether the first/last stripe should be snapped to the image border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripeClip {
    NoClip,
    ClipFirst,
    ClipLast,
    ClipBoth,
}

impl StripeClip {
    fn clips_first(self) -> bool {
        matches!(self, Self::ClipFirst | Self::ClipBoth)
    }

    fn clips_last(self) -> bool {
        matches!(self, Self::ClipLast | Self::ClipBoth)
    }
}

/// Geometry of a vertical search region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeRoi {
    /// Left border of the region in image pixels.
    pub x: f64,
    /// Region width in pixels.
    pub width: i32,
    /// Slope of the stripes (`dy/dx`).
    pub inclination: f64,
    /// Height of one stripe in rows.
    pub stripe_height: i32,
}

impl StripeRoi {
    pub fn new(x: f64, width: i32, inclination: f64, stripe_height: i32) -> Self {
        Self {
            x,
            width,
            inclination,
            stripe_height,
        }
    }
}

/// Stripe layout of one search region in an image of known size.
#[derive(Clone, Debug, PartialEq)]
pub struct StripePositioning {
    image_w: i32,
    image_h: i32,
    roi: StripeRoi,
    num_stripes: i32,
}

impl StripePositioning {
    pub fn new(image_w: usize, image_h: usize, roi: StripeRoi) -> Self {
        let image_w = image_w as i32;
        let image_h = image_h as i32;
        let mut positioning = Self {
            image_w,
            image_h,
            roi,
            num_stripes: 0,
        };
        if image_w == 0 || image_h == 0 || roi.width <= 0 || roi.stripe_height <= 0 {
            return positioning;
        }
        let right = roi.x + f64::from(roi.width);
        if roi.x < 0.0 || roi.x >= f64::from(image_w) || right > f64::from(image_w) {
            return positioning;
        }
        // the last partial stripe is dropped
        let last_row = image_h - roi.stripe_height / 2 - 1;
        if last_row < 0 {
            return positioning;
        }
        positioning.num_stripes = last_row / roi.stripe_height + 1;
        positioning
    }

    /// Layout without any stripe, used when the image is taken as fully material.
    pub fn empty(image_w: usize, image_h: usize) -> Self {
        Self::new(image_w, image_h, StripeRoi::new(0.0, 0, 0.0, 1))
    }

    #[inline]
    pub fn num_stripes(&self) -> i32 {
        self.num_stripes
    }

    #[inline]
    pub fn roi(&self) -> &StripeRoi {
        &self.roi
    }

    /// Image size as `(width, height)`.
    #[inline]
    pub fn image_size(&self) -> (i32, i32) {
        (self.image_w, self.image_h)
    }

    /// Centre of stripe `index` relative to the ROI, `None` when out of range.
    pub fn stripe_center_on_roi(&self, index: StripeIndex) -> Option<Point2<f64>> {
        if index < 0 || index >= self.num_stripes {
            return None;
        }
        let sh = self.roi.stripe_height;
        Some(Point2::new(
            f64::from(self.roi.width / 2),
            f64::from(index * sh + sh / 2),
        ))
    }

    /// Centre of stripe `index` in image coordinates.
    ///
    /// Indices before the first stripe map to the top-left corner of the ROI,
    /// indices past the last stripe to its bottom-right corner; `clip` extends
    /// that snapping to the first and/or last stripe itself.
    pub fn stripe_coordinate_in_image(&self, index: StripeIndex, clip: StripeClip) -> Point2<f64> {
        if index < 0 || (index == 0 && clip.clips_first()) {
            return Point2::new(self.roi.x, 0.0);
        }
        let bottom_right = Point2::new(
            self.roi.x + f64::from(self.roi.width) - 1.0,
            f64::from(self.image_h - 1),
        );
        if index >= self.num_stripes || (index == self.num_stripes - 1 && clip.clips_last()) {
            return bottom_right;
        }
        match self.stripe_center_on_roi(index) {
            Some(center) => Point2::new(self.roi.x + center.x, center.y),
            None => bottom_right,
        }
    }

    /// Line through the centre of stripe `index` following the inclination.
    pub fn stripe_midline_in_image(&self, index: StripeIndex) -> FittedLine {
        let mid = self.stripe_coordinate_in_image(index, StripeClip::NoClip);
        let m = self.roi.inclination;
        FittedLine::new(m, mid.y - m * mid.x)
    }

    /// Stripe containing image row `y`, `-1` when outside the image.
    pub fn stripe_index_from_image(&self, y: f64) -> StripeIndex {
        if self.num_stripes == 0 || y < 0.0 || y >= f64::from(self.image_h) {
            return -1;
        }
        ((y / f64::from(self.roi.stripe_height)).floor() as i32).min(self.num_stripes - 1)
    }
}
