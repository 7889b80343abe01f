//! Summed-area table over a rectangular window of an 8-bit image.
//!
//! The table stores `(w + 1) × (h + 1)` prefix sums so that the sum of any
//! axis-aligned box inside the window costs four lookups. Coordinates passed
//! to [`SummedAreaTable::sum`] are image coordinates; boxes are half-open and
//! clamped to the window.
use super::ImageView;

#[derive(Clone, Debug)]
pub struct SummedAreaTable {
    origin_x: usize,
    origin_y: usize,
    w: usize,
    h: usize,
    table: Vec<u64>,
}

impl SummedAreaTable {
    /// Build the table for `[x0, x0 + w) × [y0, y0 + h)`, clipped to the image.
    pub fn build<I: ImageView<Pixel = u8>>(
        image: &I,
        x0: usize,
        y0: usize,
        w: usize,
        h: usize,
    ) -> Self {
        let x0 = x0.min(image.width());
        let y0 = y0.min(image.height());
        let w = w.min(image.width() - x0);
        let h = h.min(image.height() - y0);
        let pitch = w + 1;
        let mut table = vec![0u64; pitch * (h + 1)];
        for y in 0..h {
            let row = image.row_segment(y0 + y, x0, w);
            let mut acc = 0u64;
            for (x, &px) in row.iter().enumerate() {
                acc += u64::from(px);
                table[(y + 1) * pitch + x + 1] = table[y * pitch + x + 1] + acc;
            }
        }
        Self {
            origin_x: x0,
            origin_y: y0,
            w,
            h,
            table,
        }
    }

    /// Window covered by the table as `(x0, y0, w, h)`.
    pub fn window(&self) -> (usize, usize, usize, usize) {
        (self.origin_x, self.origin_y, self.w, self.h)
    }

    /// Sum of the pixels in `[x0, x1) × [y0, y1)` (image coordinates).
    pub fn sum(&self, x0: i64, x1: i64, y0: i64, y1: i64) -> u64 {
        let cx = |x: i64| (x - self.origin_x as i64).clamp(0, self.w as i64) as usize;
        let cy = |y: i64| (y - self.origin_y as i64).clamp(0, self.h as i64) as usize;
        let (ax, bx) = (cx(x0), cx(x1));
        let (ay, by) = (cy(y0), cy(y1));
        if bx <= ax || by <= ay {
            return 0;
        }
        let pitch = self.w + 1;
        let at = |x: usize, y: usize| self.table[y * pitch + x];
        at(bx, by) + at(ax, ay) - at(ax, by) - at(bx, ay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageU8;

    #[test]
    fn box_sums_match_brute_force() {
        let (w, h) = (7usize, 5usize);
        let data: Vec<u8> = (0..w * h).map(|i| (i * 13 % 251) as u8).collect();
        let img = ImageU8::packed(w, h, &data).unwrap();
        let sat = SummedAreaTable::build(&img, 1, 1, 5, 4);
        let brute = |x0: usize, x1: usize, y0: usize, y1: usize| -> u64 {
            let mut s = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    s += u64::from(img.get(x, y));
                }
            }
            s
        };
        assert_eq!(sat.sum(1, 6, 1, 5), brute(1, 6, 1, 5));
        assert_eq!(sat.sum(2, 4, 2, 3), brute(2, 4, 2, 3));
        assert_eq!(sat.sum(3, 3, 1, 5), 0);
    }

    #[test]
    fn boxes_are_clamped_to_the_window() {
        let data = vec![10u8; 16];
        let img = ImageU8::packed(4, 4, &data).unwrap();
        let sat = SummedAreaTable::build(&img, 0, 2, 4, 10);
        assert_eq!(sat.window(), (0, 2, 4, 2));
        assert_eq!(sat.sum(-5, 10, 0, 10), 80);
    }
}
