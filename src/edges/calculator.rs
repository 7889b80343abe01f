use crate::image::{ImageU8, ImageView, SummedAreaTable};
use crate::stripes::RoiValidRange;
use crate::types::{Appearance, EdgePositionInImage, FittedLine};
use log::debug;
use nalgebra::Point2;

/// Fraction of samples dropped at each end before fitting.
const TRIM_FRACTION: f64 = 0.15;
/// Fraction of block centres ignored by the threshold variant.
const THRESHOLD_TRIM_FRACTION: f64 = 0.01;

/// Side of the edge on which the background lies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundPosition {
    Top,
    Bottom,
}

impl BackgroundPosition {
    pub fn appearance(self) -> Appearance {
        match self {
            Self::Top => Appearance::BackgroundOnTop,
            Self::Bottom => Appearance::BackgroundOnBottom,
        }
    }
}

/// Window search refining a coarse stripe border to a fitted edge line.
#[derive(Clone, Debug)]
pub struct EdgeCalculator {
    /// Mean grey value a window must exceed to count as material.
    pub thresh_material: i32,
    /// Window width in pixels, also the column step.
    pub window_width: i32,
    /// Window height in rows.
    pub window_height: i32,
    /// Rows searched beyond the border stripe on the background side.
    pub stripe_offset: i32,
    last_edge: EdgePositionInImage,
    last_points: Vec<Point2<i32>>,
}

impl Default for EdgeCalculator {
    fn default() -> Self {
        Self::new(50, 4, 10)
    }
}

impl EdgeCalculator {
    /// Calculator with a square window of `window` pixels.
    pub fn new(thresh_material: i32, window: i32, stripe_offset: i32) -> Self {
        Self {
            thresh_material,
            window_width: window,
            window_height: window,
            stripe_offset,
            last_edge: EdgePositionInImage::default(),
            last_points: Vec::new(),
        }
    }

    /// Edge fitted by the last call; `Unknown` appearance when nothing was found.
    pub fn last_edge_position(&self) -> &EdgePositionInImage {
        &self.last_edge
    }

    /// Raw samples of the last call, in image coordinates.
    pub fn last_points(&self) -> &[Point2<i32>] {
        &self.last_points
    }

    fn clear(&mut self) {
        self.last_edge = EdgePositionInImage::default();
        self.last_points.clear();
    }

    /// Locate the edge of a region whose valid range shows one, inside
    /// columns `[x, x + width)`.
    pub fn calc_edge_position(
        &mut self,
        image: &ImageU8<'_>,
        range: &RoiValidRange,
        x: i32,
        width: i32,
    ) -> &EdgePositionInImage {
        self.clear();
        let image_w = image.width() as i32;
        let image_h = image.height() as i32;
        if !range.is_edge() || range.border_background_stripe < 0 {
            return &self.last_edge;
        }
        if self.window_width <= 0 || self.window_height <= 0 || width <= 0 {
            return &self.last_edge;
        }
        let min_x = x;
        let max_x = x + width;
        if min_x < 0 || max_x > image_w {
            return &self.last_edge;
        }

        let midline = range
            .positioning
            .stripe_midline_in_image(range.border_background_stripe);
        let y_at_min = midline.y(f64::from(min_x));
        let y_at_max = midline.y(f64::from(max_x));
        let background = if range.appearance == Appearance::BackgroundOnTop {
            BackgroundPosition::Top
        } else {
            BackgroundPosition::Bottom
        };
        let (above, below) = match background {
            BackgroundPosition::Top => (
                self.stripe_offset,
                (f64::from(image_h) - y_at_min.min(y_at_max)) as i32,
            ),
            BackgroundPosition::Bottom => (y_at_min.max(y_at_max) as i32, self.stripe_offset),
        };
        self.scan_columns(image, midline, above, below, min_x, max_x, background);
        debug!(
            "edge search {:?} x=[{min_x}, {max_x}) samples={} appearance={:?} q={:.2}",
            background,
            self.last_points.len(),
            self.last_edge.appearance,
            self.last_edge.line.q
        );
        &self.last_edge
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_columns(
        &mut self,
        image: &ImageU8<'_>,
        midline: FittedLine,
        above: i32,
        below: i32,
        min_x: i32,
        max_x: i32,
        background: BackgroundPosition,
    ) {
        let image_h = image.height() as i32;
        let ww = self.window_width;
        let wh = self.window_height;
        let threshold_sum = i64::from(self.thresh_material) * i64::from(ww * wh);

        let mid_left = midline.y(f64::from(min_x)) as i32;
        let mid_right = midline.y(f64::from(max_x)) as i32;
        let table_y0 = (mid_left.min(mid_right) - above).max(0);
        let table_y1 = (mid_left.max(mid_right) + below + 1).min(image_h);
        if table_y1 <= table_y0 {
            return;
        }
        let table = SummedAreaTable::build(
            image,
            min_x as usize,
            table_y0 as usize,
            (max_x - min_x) as usize,
            (table_y1 - table_y0) as usize,
        );

        // background on top: walk down from the background; otherwise walk up
        let forward = background == BackgroundPosition::Top;
        self.last_points.reserve(((max_x - min_x) / ww) as usize);
        let mut x = min_x;
        while x <= max_x - ww {
            let mid = midline.y(f64::from(x));
            let min_y = ((mid - f64::from(above)) as i32).min(image_h - 1).max(0);
            let max_y = ((mid + f64::from(below)) as i32).min(image_h - 1).max(0);
            let (x0, x1) = (i64::from(x), i64::from(x + ww));
            if forward {
                let last_valid = max_y - wh - 1;
                for y in min_y..=last_valid {
                    let sum = table.sum(x0, x1, i64::from(y), i64::from(y + wh));
                    if sum as i64 > threshold_sum || y == last_valid {
                        self.last_points.push(Point2::new(x, y));
                        break;
                    }
                }
            } else {
                let last_valid = min_y + wh + 1;
                for y in (last_valid..=max_y).rev() {
                    let sum = table.sum(x0, x1, i64::from(y - wh), i64::from(y));
                    if sum as i64 > threshold_sum || y == last_valid {
                        self.last_points.push(Point2::new(x, y));
                        break;
                    }
                }
            }
            x += ww;
        }

        let mut ys: Vec<(i32, i32)> = self.last_points.iter().map(|p| (p.y, p.x)).collect();
        ys.sort_unstable();
        let kill = (TRIM_FRACTION * ys.len() as f64).round() as usize;
        if ys.len() <= 2 * kill {
            return;
        }
        let kept = &ys[kill..ys.len() - kill];
        let sum_y: f64 = kept.iter().map(|&(y, _)| f64::from(y)).sum();
        let sum_x: f64 = kept.iter().map(|&(_, x)| f64::from(x)).sum();
        let m = midline.m;
        self.last_edge = EdgePositionInImage::new(
            background.appearance(),
            FittedLine::new(m, (sum_y - m * sum_x) / kept.len() as f64),
        );
    }

    /// Block-mean alternative: tile `[min_x, max_x) × [min_y, max_y)` with
    /// windows and fit a horizontal line through the outermost material block
    /// on the background side.
    pub fn calc_edge_position_from_threshold(
        &mut self,
        image: &ImageU8<'_>,
        min_y: i32,
        max_y: i32,
        min_x: i32,
        max_x: i32,
        background: BackgroundPosition,
    ) -> &EdgePositionInImage {
        self.clear();
        let ww = self.window_width;
        let wh = self.window_height;
        let inside = min_x >= 0
            && min_y >= 0
            && max_x <= image.width() as i32
            && max_y <= image.height() as i32;
        if ww <= 0 || wh <= 0 || !inside || max_x <= min_x || max_y <= min_y {
            return &self.last_edge;
        }
        let table = SummedAreaTable::build(
            image,
            min_x as usize,
            min_y as usize,
            (max_x - min_x) as usize,
            (max_y - min_y) as usize,
        );
        let pixels = f64::from(ww * wh);
        let mut y = min_y;
        while y < max_y - wh {
            let mut x = min_x;
            while x < max_x - ww {
                let sum = table.sum(
                    i64::from(x),
                    i64::from(x + ww),
                    i64::from(y),
                    i64::from(y + wh),
                );
                if (sum as f64 / pixels).round() > f64::from(self.thresh_material) {
                    self.last_points.push(Point2::new(x + ww / 2, y + wh / 2));
                }
                x += ww;
            }
            y += wh;
        }
        if self.last_points.is_empty() {
            return &self.last_edge;
        }

        let mut ys: Vec<i32> = self.last_points.iter().map(|p| p.y).collect();
        ys.sort_unstable();
        let kill = (THRESHOLD_TRIM_FRACTION * ys.len() as f64) as usize;
        let row = match background {
            BackgroundPosition::Top => ys[kill],
            BackgroundPosition::Bottom => ys[ys.len() - 1 - kill],
        };
        self.last_edge =
            EdgePositionInImage::new(background.appearance(), FittedLine::horizontal(f64::from(row)));
        &self.last_edge
    }
}
