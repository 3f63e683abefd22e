//! Snapshot types and data structures.

use std::fmt;
use std::time::Instant;

use image::{DynamicImage, RgbImage, RgbaImage};

/// Snapshot dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel layout of a captured snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
    /// RGBA format (4 bytes per pixel)
    Rgba,
}

impl PixelFormat {
    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// A single still frame taken from the capture source.
///
/// Dimensions are whatever the source produced. The pixel buffer is not
/// validated on construction; preprocessing rejects buffers whose length
/// does not match `width * height * bytes_per_pixel`.
#[derive(Debug, Clone)]
pub struct RawCapture {
    /// Packed pixel data, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// Timestamp when the snapshot was taken
    pub timestamp: Instant,
}

impl RawCapture {
    /// Wrap a packed pixel buffer.
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    /// Take ownership of an RGBA image buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, PixelFormat::Rgba)
    }

    /// Take ownership of an RGB image buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height, PixelFormat::Rgb)
    }

    /// Decode an encoded snapshot (JPEG, PNG, ...) as handed out by a webcam widget.
    pub fn decode(bytes: &[u8]) -> Result<Self, CameraError> {
        if bytes.is_empty() {
            return Err(CameraError::EmptySnapshot);
        }

        let decoded =
            image::load_from_memory(bytes).map_err(|e| CameraError::Decode(e.to_string()))?;

        Ok(match decoded {
            DynamicImage::ImageRgb8(rgb) => Self::from_rgb(rgb),
            other => Self::from_rgba(other.into_rgba8()),
        })
    }

    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Resolution of the snapshot.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// Expected buffer length for the declared dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel()
    }

    /// View the snapshot as an RGBA image.
    ///
    /// Returns `None` if the buffer length does not match the declared
    /// dimensions. RGB snapshots get an opaque alpha channel.
    pub fn to_rgba(&self) -> Option<RgbaImage> {
        if self.data.len() != self.expected_len() {
            return None;
        }

        match self.format {
            PixelFormat::Rgba => RgbaImage::from_raw(self.width, self.height, self.data.clone()),
            PixelFormat::Rgb => {
                let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
                for rgb in self.data.chunks_exact(3) {
                    rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], u8::MAX]);
                }
                RgbaImage::from_raw(self.width, self.height, rgba)
            }
        }
    }
}

/// Errors that can occur while obtaining a snapshot.
#[derive(Debug)]
pub enum CameraError {
    /// Snapshot bytes were empty
    EmptySnapshot,
    /// Snapshot bytes could not be decoded as an image
    Decode(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::EmptySnapshot => write!(f, "Snapshot is empty"),
            CameraError::Decode(msg) => write!(f, "Failed to decode snapshot: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
