//! Snapshot preprocessing: raw capture to upload payload.
//!
//! Two steps, both deterministic and free of I/O:
//!
//! 1. **Normalize** - stretch the capture into a 150x150 square and replace
//!    every RGB triple with its unweighted mean (alpha untouched)
//! 2. **Encode** - JPEG at quality 0.9 by default, PNG as an alternative
//!
//! [`ImagePreprocessor`] bundles both behind one call for the controller.

mod encode;
mod errors;
mod grayscale;
mod resize;

pub use encode::{encode, quality_percent, EncodedPayload, PayloadFormat, DEFAULT_JPEG_QUALITY};
pub use errors::PreprocessError;
pub use grayscale::{channel_mean, is_grayscale, to_grayscale_in_place};
pub use resize::{stretch_to, TARGET_SIZE};

use image::RgbaImage;

use crate::camera::RawCapture;

/// Fixed-size grayscale derivation of a raw capture.
///
/// Always [`TARGET_SIZE`] x [`TARGET_SIZE`] with R = G = B at every pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pixels: RgbaImage,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

/// Stretch and gray a raw capture.
///
/// # Errors
///
/// `PreprocessError::RenderContextUnavailable` if the capture has a zero
/// dimension or its pixel buffer does not match its declared size.
pub fn normalize(raw: &RawCapture) -> Result<NormalizedImage, PreprocessError> {
    if raw.width == 0 || raw.height == 0 {
        return Err(PreprocessError::RenderContextUnavailable {
            reason: format!("capture has zero size ({}x{})", raw.width, raw.height),
        });
    }

    let source = raw
        .to_rgba()
        .ok_or_else(|| PreprocessError::RenderContextUnavailable {
            reason: format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} {:?}",
                raw.data.len(),
                raw.expected_len(),
                raw.width,
                raw.height,
                raw.format
            ),
        })?;

    let mut pixels = stretch_to(source, TARGET_SIZE, TARGET_SIZE);
    to_grayscale_in_place(&mut pixels);

    Ok(NormalizedImage { pixels })
}

/// Output encoding settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessSettings {
    pub format: PayloadFormat,
    /// Quality factor in (0, 1], JPEG only
    pub quality: f32,
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        Self {
            format: PayloadFormat::Jpeg,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Runs normalize + encode with fixed settings.
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    settings: PreprocessSettings,
}

impl ImagePreprocessor {
    /// Create a preprocessor emitting JPEG at quality 0.9.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a preprocessor with custom output settings.
    pub fn with_settings(settings: PreprocessSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PreprocessSettings {
        &self.settings
    }

    pub fn normalize(&self, raw: &RawCapture) -> Result<NormalizedImage, PreprocessError> {
        normalize(raw)
    }

    pub fn encode(&self, image: &NormalizedImage) -> Result<EncodedPayload, PreprocessError> {
        encode(image, self.settings.format, self.settings.quality)
    }

    /// Normalize and encode in one go.
    pub fn process(
        &self,
        raw: &RawCapture,
    ) -> Result<(NormalizedImage, EncodedPayload), PreprocessError> {
        let normalized = self.normalize(raw)?;
        let payload = self.encode(&normalized)?;
        log::debug!(
            "Preprocessed {}x{} capture into {} byte {} payload",
            raw.width,
            raw.height,
            payload.len(),
            payload.format()
        );
        Ok((normalized, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PixelFormat;

    #[test]
    fn test_normalize_rgb_capture() {
        let raw = RawCapture::new(vec![90, 30, 0].repeat(4 * 2), 4, 2, PixelFormat::Rgb);
        let img = normalize(&raw).unwrap();
        assert_eq!((img.width(), img.height()), (150, 150));
        let pixel = img.as_rgba().get_pixel(10, 10);
        assert_eq!(pixel.0, [40, 40, 40, 255]);
    }

    #[test]
    fn test_normalize_zero_size_fails() {
        let raw = RawCapture::new(Vec::new(), 0, 480, PixelFormat::Rgba);
        let result = normalize(&raw);
        assert!(matches!(
            result,
            Err(PreprocessError::RenderContextUnavailable { .. })
        ));
    }

    #[test]
    fn test_normalize_mismatched_buffer_fails() {
        let raw = RawCapture::new(vec![0; 10], 2, 2, PixelFormat::Rgba);
        let result = normalize(&raw);
        assert!(matches!(
            result,
            Err(PreprocessError::RenderContextUnavailable { .. })
        ));
    }

    #[test]
    fn test_process_defaults_to_jpeg() {
        let raw = RawCapture::new(vec![200; 8 * 6 * 4], 8, 6, PixelFormat::Rgba);
        let (normalized, payload) = ImagePreprocessor::new().process(&raw).unwrap();
        assert_eq!(normalized.width(), TARGET_SIZE);
        assert_eq!(payload.format(), PayloadFormat::Jpeg);
        // JPEG SOI marker
        assert_eq!(&payload.as_bytes()[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_process_png_setting() {
        let preprocessor = ImagePreprocessor::with_settings(PreprocessSettings {
            format: PayloadFormat::Png,
            quality: 1.0,
        });
        let raw = RawCapture::new(vec![5; 3 * 3 * 3], 3, 3, PixelFormat::Rgb);
        let (_, payload) = preprocessor.process(&raw).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(&payload.as_bytes()[1..4], b"PNG");
    }
}
