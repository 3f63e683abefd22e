//! Binary encoding of normalized images for upload.

use std::fmt;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::errors::PreprocessError;
use super::grayscale::luma_plane;
use super::NormalizedImage;

/// Default JPEG quality factor.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.9;

/// Upload encoding of the normalized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadFormat {
    #[default]
    Jpeg,
    Png,
}

impl PayloadFormat {
    /// MIME type sent with the upload.
    pub fn mime_type(self) -> &'static str {
        match self {
            PayloadFormat::Jpeg => "image/jpeg",
            PayloadFormat::Png => "image/png",
        }
    }

    /// Fixed file name used for the multipart part.
    pub fn file_name(self) -> &'static str {
        match self {
            PayloadFormat::Jpeg => "capture.jpg",
            PayloadFormat::Png => "capture.png",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Jpeg => write!(f, "JPEG"),
            PayloadFormat::Png => write!(f, "PNG"),
        }
    }
}

/// Encoded image bytes ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    format: PayloadFormat,
}

impl EncodedPayload {
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Map a quality factor in (0, 1] onto the encoder's 1..=100 scale.
///
/// Non-finite values fall back to [`DEFAULT_JPEG_QUALITY`].
pub fn quality_percent(quality: f32) -> u8 {
    let quality = if quality.is_finite() {
        quality
    } else {
        DEFAULT_JPEG_QUALITY
    };
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode a normalized image.
///
/// JPEG is written from the luma plane, since the image is already true
/// grayscale and JPEG has no alpha channel. PNG keeps the RGBA pixels.
/// `quality` only applies to JPEG.
pub fn encode(
    image: &NormalizedImage,
    format: PayloadFormat,
    quality: f32,
) -> Result<EncodedPayload, PreprocessError> {
    let pixels = image.as_rgba();
    let (width, height) = pixels.dimensions();
    let mut bytes = Vec::new();

    let result = match format {
        PayloadFormat::Jpeg => {
            let luma = luma_plane(pixels);
            JpegEncoder::new_with_quality(&mut bytes, quality_percent(quality)).write_image(
                &luma,
                width,
                height,
                ExtendedColorType::L8,
            )
        }
        PayloadFormat::Png => PngEncoder::new(&mut bytes).write_image(
            pixels.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };

    result.map_err(|e| PreprocessError::EncodeFailed {
        format,
        reason: e.to_string(),
    })?;

    if bytes.is_empty() {
        return Err(PreprocessError::EncodeFailed {
            format,
            reason: "encoder produced no bytes".to_string(),
        });
    }

    log::debug!(
        "Encoded {}x{} image as {} ({} bytes)",
        width,
        height,
        format,
        bytes.len()
    );

    Ok(EncodedPayload { bytes, format })
}
