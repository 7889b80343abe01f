/// Read-only access to a single-channel image stored row by row.
///
/// The search regions of the detectors only ever read horizontal runs of
/// pixels, so the trait is built around rows and row segments.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    /// Pixels of row `y`, without padding.
    fn row(&self, y: usize) -> &[Self::Pixel];

    /// `len` pixels of row `y` starting at column `x`.
    #[inline]
    fn row_segment(&self, y: usize, x: usize, len: usize) -> &[Self::Pixel] {
        &self.row(y)[x..x + len]
    }

    /// True when `(x, y)` addresses a pixel of the image.
    #[inline]
    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    fn as_slice(&self) -> Option<&[Self::Pixel]> {
        None
    }
}
