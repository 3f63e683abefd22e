//! Fixed-size stretch resize.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Side length of the normalized square image.
pub const TARGET_SIZE: u32 = 150;

/// Draw `source` into a `width` x `height` target.
///
/// Source and destination rectangles are both anchored at the origin and
/// cover the whole image, so the aspect ratio is not preserved. An image that
/// already has the target size is returned as-is.
pub fn stretch_to(source: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        return source;
    }
    imageops::resize(&source, width, height, FilterType::Triangle)
}
