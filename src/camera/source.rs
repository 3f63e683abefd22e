//! Snapshot sources the capture controller pulls frames from.

use std::sync::{Arc, Mutex};

use super::types::RawCapture;

/// Anything that can hand out a still frame on demand.
///
/// `None` means the source is not ready yet (camera still starting, no frame
/// received). Callers treat that as a no-op, not an error.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> Option<RawCapture>;
}

impl<F> SnapshotSource for F
where
    F: Fn() -> Option<RawCapture> + Send + Sync,
{
    fn snapshot(&self) -> Option<RawCapture> {
        self()
    }
}

/// Latest-frame buffer shared between a camera feed and the controller.
///
/// The feed side calls [`FrameBuffer::publish`] for every decoded frame; the
/// controller side takes a copy of whatever frame is current when a capture
/// is requested. Cloning the handle shares the same buffer.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    latest: Arc<Mutex<Option<RawCapture>>>,
}

impl FrameBuffer {
    /// Create an empty buffer. Snapshots return `None` until a frame arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame.
    pub fn publish(&self, frame: RawCapture) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(frame);
        }
    }

    /// Drop the current frame, e.g. when the feed stops.
    pub fn clear(&self) {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = None;
        }
    }

    /// Whether a frame is available.
    pub fn is_ready(&self) -> bool {
        self.latest.lock().map(|l| l.is_some()).unwrap_or(false)
    }
}

impl SnapshotSource for FrameBuffer {
    fn snapshot(&self) -> Option<RawCapture> {
        let latest = self.latest.lock().ok()?;
        latest.clone()
    }
}

/// A source that always returns the same frame.
#[derive(Debug, Clone)]
pub struct StillImage {
    frame: RawCapture,
}

impl StillImage {
    pub fn new(frame: RawCapture) -> Self {
        Self { frame }
    }
}

impl SnapshotSource for StillImage {
    fn snapshot(&self) -> Option<RawCapture> {
        Some(self.frame.clone())
    }
}
