//! Per-stripe intensity statistics and tube/background labelling.

use super::positioning::{StripeIndex, StripePositioning};
use crate::image::{ImageU8, ImageView};
use serde::{Deserialize, Serialize};

/// Label of one stripe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StripeEvaluation {
    /// No pixel could be sampled.
    NotEvaluated,
    /// Material.
    Tube,
    /// Background.
    NotTube,
}

/// Labels of all stripes of a positioning, indexed by stripe index.
pub type StripesResult = Vec<StripeEvaluation>;

/// Statistics gathered over the sampled pixels of one stripe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeStatistics {
    pub valid: bool,
    pub pixel_count: u32,
    pub mean: i32,
    pub min: i32,
    pub max: i32,
    /// Pixels at or above the material threshold.
    pub count_material: u32,
    /// Pixels at or below the background threshold.
    pub count_background: u32,
}

/// Thresholds and sampling steps used to label stripes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStripeCalculator {
    /// Grey value at or above which a pixel counts as material.
    pub threshold_material: i32,
    /// Grey value at or below which a pixel counts as background.
    pub threshold_background: i32,
    /// Minimum `max - min` spread that counts as a material clue.
    pub thresh_max_min_diff: i32,
    /// Horizontal sampling step.
    pub speeder_x: i32,
    /// Vertical sampling step.
    pub speeder_y: i32,
}

impl Default for ImageStripeCalculator {
    fn default() -> Self {
        Self {
            threshold_material: 50,
            threshold_background: 50,
            thresh_max_min_diff: 30,
            speeder_x: 1,
            speeder_y: 1,
        }
    }
}

impl ImageStripeCalculator {
    /// Mean grey value above which a stripe counts as bright.
    #[inline]
    pub fn threshold(&self) -> i32 {
        (self.threshold_material + self.threshold_background) / 2
    }

    /// Sample the pixels of stripe `index` along its (possibly inclined) centre line.
    ///
    /// Returns an invalid result when the image does not match the positioning
    /// or the index is out of range.
    pub fn compute_single_stripe<I: ImageView<Pixel = u8>>(
        &self,
        image: &I,
        index: StripeIndex,
        positioning: &StripePositioning,
    ) -> StripeStatistics {
        let mut ret = StripeStatistics::default();
        let (image_w, image_h) = positioning.image_size();
        if image.width() as i32 != image_w || image.height() as i32 != image_h {
            return ret;
        }
        let Some(center) = positioning.stripe_center_on_roi(index) else {
            return ret;
        };
        let roi = positioning.roi();
        let m = roi.inclination;
        let q = center.y - m * (center.x + roi.x);

        let speeder_x = self.speeder_x.max(1);
        let speeder_y = self.speeder_y.max(1);
        let offset_x = speeder_x / 2;
        let offset_y = roi.stripe_height % speeder_y;
        let half_range_y = (roi.stripe_height - 2 * offset_y) / 2 - 1;

        let mut sum = 0i64;
        ret.min = 300;
        ret.max = -1;

        let x_first = (roi.x + f64::from(offset_x)) as i32;
        let x_end = (roi.x + f64::from(roi.width - speeder_x / 2)) as i32;
        for x in (x_first..x_end).step_by(speeder_x as usize) {
            if !image.contains(i64::from(x), 0) {
                continue;
            }
            let y0 = (m * f64::from(x) + q).round() as i32;
            let y_first = (y0 - half_range_y).max(0);
            let y_end = (y0 + half_range_y).min(image_h);
            for y in (y_first..y_end).step_by(speeder_y as usize) {
                let grey = i32::from(image.row(y as usize)[x as usize]);
                ret.pixel_count += 1;
                sum += i64::from(grey);
                ret.max = ret.max.max(grey);
                ret.min = ret.min.min(grey);
                if grey >= self.threshold_material {
                    ret.count_material += 1;
                }
                if grey <= self.threshold_background {
                    ret.count_background += 1;
                }
            }
        }

        ret.mean = if ret.pixel_count > 0 {
            (sum / i64::from(ret.pixel_count)) as i32
        } else {
            1
        };
        ret.valid = true;
        ret
    }

    /// Label a stripe from its statistics: two of three material clues make a tube.
    pub fn classify(&self, stats: &StripeStatistics) -> StripeEvaluation {
        if !stats.valid || stats.pixel_count == 0 {
            return StripeEvaluation::NotEvaluated;
        }
        let spread = stats.max - stats.min > self.thresh_max_min_diff;
        let bright = stats.mean > self.threshold();
        let populated = f64::from(stats.count_material)
            > 0.2 * f64::from(stats.count_material + stats.count_background);
        let clues = u8::from(spread) + u8::from(bright) + u8::from(populated);
        if clues > 1 {
            StripeEvaluation::Tube
        } else {
            StripeEvaluation::NotTube
        }
    }

    /// Label every stripe of `positioning`.
    pub fn examine_stripes(&self, image: &ImageU8<'_>, positioning: &StripePositioning) -> StripesResult {
        let n = positioning.num_stripes().max(0);
        self.evaluate_all(image, positioning, n)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, image: &ImageU8<'_>, positioning: &StripePositioning, n: i32) -> StripesResult {
        (0..n)
            .map(|index| self.classify(&self.compute_single_stripe(image, index, positioning)))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, image: &ImageU8<'_>, positioning: &StripePositioning, n: i32) -> StripesResult {
        use rayon::prelude::*;

        (0..n)
            .into_par_iter()
            .map(|index| self.classify(&self.compute_single_stripe(image, index, positioning)))
            .collect()
    }
}
