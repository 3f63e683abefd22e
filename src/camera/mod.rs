//! Camera snapshot module.
//!
//! The webcam widget itself is an outside collaborator. This module defines
//! what the rest of the crate needs from it:
//! - The captured still frame via [`RawCapture`]
//! - The on-demand snapshot seam via [`SnapshotSource`]
//! - A latest-frame handle a camera feed can publish into via [`FrameBuffer`]

mod source;
mod types;

pub use source::{FrameBuffer, SnapshotSource, StillImage};
pub use types::{CameraError, PixelFormat, RawCapture, Resolution};
