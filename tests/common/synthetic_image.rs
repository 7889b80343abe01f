use start_end_detector::image::ImageU8;

pub const WIDTH: usize = 500;
pub const HEIGHT: usize = 250;
pub const BACKGROUND: u8 = 20;
pub const MATERIAL: u8 = 150;
/// Column where the left half of the synthetic frames ends.
pub const SPLIT_X: usize = 200;

/// Frame showing only background.
pub fn background_image() -> Vec<u8> {
    vec![BACKGROUND; WIDTH * HEIGHT]
}

/// Frame showing only material.
pub fn full_image() -> Vec<u8> {
    vec![MATERIAL; WIDTH * HEIGHT]
}

/// Material from the top down to `y_left` / `y_right` (inclusive), left and
/// right of column `split_x`.
pub fn edges_background_on_bottom(y_left: usize, y_right: usize, split_x: usize) -> Vec<u8> {
    assert!(split_x <= WIDTH, "split must lie inside the image");
    let mut img = background_image();
    for (y, row) in img.chunks_exact_mut(WIDTH).enumerate() {
        if y <= y_left {
            row[..split_x].fill(MATERIAL);
        }
        if y <= y_right {
            row[split_x..].fill(MATERIAL);
        }
    }
    img
}

/// Material from `y_left` / `y_right` down to the bottom, left and right of
/// [`SPLIT_X`].
pub fn edges_background_on_top(y_left: usize, y_right: usize) -> Vec<u8> {
    let mut img = background_image();
    for (y, row) in img.chunks_exact_mut(WIDTH).enumerate() {
        if y >= y_left {
            row[..SPLIT_X].fill(MATERIAL);
        }
        if y >= y_right {
            row[SPLIT_X..].fill(MATERIAL);
        }
    }
    img
}

pub fn view(buffer: &[u8]) -> ImageU8<'_> {
    ImageU8 {
        w: WIDTH,
        h: HEIGHT,
        stride: WIDTH,
        data: buffer,
    }
}
