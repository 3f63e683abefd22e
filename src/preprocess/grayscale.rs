//! Unweighted-mean grayscale conversion.

use image::RgbaImage;

/// Mean of an RGB triple, rounded to the nearest integer.
///
/// The sum of three channels divided by three never lands exactly on .5,
/// so `(sum + 1) / 3` is the same as rounding.
#[inline]
pub fn channel_mean(r: u8, g: u8, b: u8) -> u8 {
    let sum = r as u16 + g as u16 + b as u16;
    ((sum + 1) / 3) as u8
}

/// Convert an RGBA image to true grayscale in place.
///
/// Every pixel gets R = G = B = the rounded mean of its original triple.
/// Alpha is left untouched. Single pass, no dithering, no gamma correction.
pub fn to_grayscale_in_place(image: &mut RgbaImage) {
    for rgba in image.chunks_exact_mut(4) {
        let gray = channel_mean(rgba[0], rgba[1], rgba[2]);
        rgba[0] = gray;
        rgba[1] = gray;
        rgba[2] = gray;
    }
}

/// Whether every pixel already has R = G = B.
pub fn is_grayscale(image: &RgbaImage) -> bool {
    image
        .chunks_exact(4)
        .all(|rgba| rgba[0] == rgba[1] && rgba[1] == rgba[2])
}

/// Extract the luma plane of an image that is already grayscale.
pub fn luma_plane(image: &RgbaImage) -> Vec<u8> {
    let pixel_count = (image.width() * image.height()) as usize;
    let mut luma = Vec::with_capacity(pixel_count);
    for rgba in image.chunks_exact(4) {
        luma.push(rgba[0]);
    }
    luma
}
