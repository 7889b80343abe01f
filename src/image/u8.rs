use crate::error::DetectionError;

/// Borrowed 8-bit grayscale image in row-major layout.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap a buffer, checking that every row fits inside `data`.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a [u8]) -> Result<Self, DetectionError> {
        let img = Self { w, h, stride, data };
        img.validate()?;
        Ok(img)
    }

    /// Wrap a tightly packed buffer (`stride == w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Result<Self, DetectionError> {
        Self::new(w, h, w, data)
    }

    /// Check the view invariants without building a new one.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.w == 0 || self.h == 0 {
            return Err(DetectionError::EmptyImage {
                width: self.w,
                height: self.h,
            });
        }
        if self.stride < self.w {
            return Err(DetectionError::InvalidStride {
                stride: self.stride,
                width: self.w,
            });
        }
        let expected = self
            .stride
            .checked_mul(self.h - 1)
            .and_then(|n| n.checked_add(self.w));
        match expected {
            Some(expected) if self.data.len() >= expected => {}
            _ => {
                return Err(DetectionError::BufferTooSmall {
                    expected: expected.unwrap_or(usize::MAX),
                    actual: self.data.len(),
                })
            }
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}
