//! Edge positions stored along the seam and the left/right skew between them.

use crate::types::{Appearance, EdgePositionInImage, InputImageContext};
use serde::Serialize;

/// An edge as seen in one image, located along the seam.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePositionInSeam {
    pub position: EdgePositionInImage,
    /// Counter of the image the edge was found in, -1 if none.
    pub image_number: i32,
    /// Seam position of that image.
    pub context_image_mm: f64,
    /// Distance of the edge at `x = 0` from the measured image border.
    pub distance_image_border_mm: f64,
}

impl Default for EdgePositionInSeam {
    fn default() -> Self {
        Self {
            position: EdgePositionInImage::default(),
            image_number: -1,
            context_image_mm: 0.0,
            distance_image_border_mm: 0.0,
        }
    }
}

impl EdgePositionInSeam {
    /// Locate `position` using the context of its image.
    ///
    /// With `from_bottom` the distance is measured from the bottom border of
    /// the sensor image instead of the top.
    pub fn new(position: EdgePositionInImage, context: &InputImageContext, from_bottom: bool) -> Self {
        if !position.valid() {
            return Self {
                position,
                ..Self::default()
            };
        }
        let y = position.line.y(0.0) + f64::from(context.offset_y);
        let distance_px = if from_bottom {
            f64::from(context.sensor_image_height) - y
        } else {
            y
        };
        Self {
            position,
            image_number: context.image_counter,
            context_image_mm: context.image_position_mm,
            distance_image_border_mm: distance_px * context.pixel_to_mm,
        }
    }

    /// Placeholder for a region that is switched off.
    pub fn not_available() -> Self {
        let mut edge = Self::default();
        edge.position.appearance = Appearance::NotAvailable;
        edge
    }

    #[inline]
    pub fn found(&self) -> bool {
        self.position.valid()
    }

    /// Seam position of the edge itself.
    #[inline]
    pub fn seam_position_mm(&self) -> f64 {
        self.context_image_mm + self.distance_image_border_mm
    }
}

/// Pair of left/right edges of the same kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMisalignment {
    pub left: EdgePositionInSeam,
    pub right: EdgePositionInSeam,
}

impl EdgeMisalignment {
    pub fn new(left: EdgePositionInSeam, right: EdgePositionInSeam) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn found(&self) -> bool {
        self.left.found() && self.right.found()
    }

    /// Right edge position minus left edge position along the seam.
    pub fn misalignment_mm(&self) -> Option<f64> {
        self.found()
            .then(|| self.right.seam_position_mm() - self.left.seam_position_mm())
    }

    /// Common appearance of both edges, `Unsupported` when they differ or
    /// one is missing.
    pub fn appearance(&self) -> Appearance {
        if self.found() && self.left.position.appearance == self.right.position.appearance {
            self.left.position.appearance
        } else {
            Appearance::Unsupported
        }
    }

    /// Seam position of the innermost of the two edges, -1 when the pair
    /// does not form an edge.
    ///
    /// For a start edge the later edge counts, for an end edge the earlier.
    /// `use_y` adds the distance of the edge from the image border to the
    /// image position.
    pub fn distance_from_seam_start(&self, use_y: bool, is_start: bool) -> f64 {
        if !self.appearance().is_edge() {
            return -1.0;
        }
        let position = |edge: &EdgePositionInSeam| {
            if use_y {
                edge.seam_position_mm()
            } else {
                edge.context_image_mm
            }
        };
        let (left, right) = (position(&self.left), position(&self.right));
        if is_start {
            left.max(right)
        } else {
            left.min(right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FittedLine;
    use approx::assert_relative_eq;

    fn context(counter: i32) -> InputImageContext {
        InputImageContext {
            image_counter: counter,
            image_position_mm: 1.1 * f64::from(counter),
            pixel_to_mm: 0.5,
            offset_x: 0,
            offset_y: 10,
            sensor_image_height: 1024,
        }
    }

    fn edge(appearance: Appearance, y: f64) -> EdgePositionInImage {
        EdgePositionInImage::new(appearance, FittedLine::horizontal(y))
    }

    #[test]
    fn distance_is_measured_from_the_requested_border() {
        let ctx = context(2);
        let top = EdgePositionInSeam::new(edge(Appearance::BackgroundOnBottom, 100.0), &ctx, false);
        assert_relative_eq!(top.distance_image_border_mm, 55.0);
        let bottom = EdgePositionInSeam::new(edge(Appearance::BackgroundOnBottom, 100.0), &ctx, true);
        assert_relative_eq!(bottom.distance_image_border_mm, (1024.0 - 110.0) * 0.5);
        assert_eq!(bottom.image_number, 2);
    }

    #[test]
    fn non_edges_are_not_located() {
        let e = EdgePositionInSeam::new(edge(Appearance::AllMaterial, 100.0), &context(3), false);
        assert!(!e.found());
        assert_eq!(e.image_number, -1);
        assert!(!EdgePositionInSeam::not_available().found());
    }

    #[test]
    fn misalignment_needs_both_edges() {
        let ctx = context(1);
        let left = EdgePositionInSeam::new(edge(Appearance::BackgroundOnBottom, 102.0), &ctx, false);
        let right = EdgePositionInSeam::new(edge(Appearance::BackgroundOnBottom, 99.0), &ctx, false);
        let pair = EdgeMisalignment::new(left, right);
        assert!(pair.found());
        assert_relative_eq!(pair.misalignment_mm().unwrap_or(f64::NAN), -1.5, epsilon = 1e-9);
        assert_eq!(pair.appearance(), Appearance::BackgroundOnBottom);

        let half = EdgeMisalignment::new(left, EdgePositionInSeam::default());
        assert!(!half.found());
        assert!(half.misalignment_mm().is_none());
        assert_eq!(half.appearance(), Appearance::Unsupported);
        assert_relative_eq!(half.distance_from_seam_start(true, true), -1.0);
    }

    #[test]
    fn innermost_edge_depends_on_kind() {
        let left = EdgePositionInSeam::new(edge(Appearance::BackgroundOnTop, 20.0), &context(4), false);
        let right = EdgePositionInSeam::new(edge(Appearance::BackgroundOnTop, 20.0), &context(5), false);
        let pair = EdgeMisalignment::new(left, right);
        assert_relative_eq!(pair.distance_from_seam_start(false, true), 5.5, epsilon = 1e-9);
        assert_relative_eq!(pair.distance_from_seam_start(false, false), 4.4, epsilon = 1e-9);
        assert_relative_eq!(pair.distance_from_seam_start(true, false), 19.4, epsilon = 1e-9);
    }

    #[test]
    fn mixed_orientations_have_no_common_appearance() {
        let ctx = context(1);
        let pair = EdgeMisalignment::new(
            EdgePositionInSeam::new(edge(Appearance::BackgroundOnTop, 20.0), &ctx, false),
            EdgePositionInSeam::new(edge(Appearance::BackgroundOnBottom, 20.0), &ctx, false),
        );
        assert!(pair.found());
        assert_eq!(pair.appearance(), Appearance::Unsupported);
        assert_relative_eq!(pair.distance_from_seam_start(false, true), -1.0);
    }
}
