//! Owned frames and disk I/O.
//!
//! Sensor frames are handled as 8-bit grayscale. [`GrayImageU8`] owns the
//! pixels of one frame and hands out [`ImageU8`] views to the detectors.
//! Errors are plain strings carrying the offending path.
use super::ImageU8;
use image::{GrayImage, ImageBuffer};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned, tightly packed 8-bit grayscale frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Take ownership of `data`, which must hold exactly `width × height` pixels.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, String> {
        if data.len() != width * height {
            return Err(format!(
                "Frame of {width}x{height} needs {} bytes, got {}",
                width * height,
                data.len()
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame of `width × height` pixels all set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set the pixels `[x0, x1)` of row `y` to `value`, clipped to the row.
    pub fn fill_row_span(&mut self, y: usize, x0: usize, x1: usize, value: u8) {
        if y >= self.height {
            return;
        }
        let x1 = x1.min(self.width);
        if x0 >= x1 {
            return;
        }
        let start = y * self.width;
        self.data[start + x0..start + x1].fill(value);
    }

    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Load a frame from disk; colour images are converted to luma.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    GrayImageU8::from_raw(width, height, img.into_raw())
        .map_err(|e| format!("Failed to decode {}: {e}", path.display()))
}

/// Write a frame as PNG, creating parent directories.
pub fn save_grayscale_u8(frame: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer: GrayImage =
        ImageBuffer::from_raw(frame.width as u32, frame.height as u32, frame.data.clone())
            .ok_or_else(|| format!("Frame does not fit {}x{}", frame.width, frame.height))?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display())),
        _ => Ok(()),
    }
}
