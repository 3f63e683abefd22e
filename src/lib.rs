//! snapshot-classifier library crate.
//!
//! Capture a still frame, normalize it to a 150x150 grayscale image, send it
//! to a remote classifier and track the returned label.

pub mod camera;
pub mod config;
pub mod controller;
pub mod predict;
pub mod preprocess;

pub use camera::{FrameBuffer, RawCapture, SnapshotSource};
pub use config::Config;
pub use controller::{CaptureController, CaptureOutcome, SessionState, SessionView};
pub use predict::{HttpPredictionClient, MockPredictionClient, PredictionClient, PredictionResult};
pub use preprocess::{EncodedPayload, ImagePreprocessor, NormalizedImage};
