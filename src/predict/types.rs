//! Prediction result and the client seam.

use std::fmt;

use async_trait::async_trait;

use super::error::PredictionFailed;
use crate::preprocess::EncodedPayload;

/// Label returned by the classifier, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    label: String,
}

impl PredictionResult {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn into_label(self) -> String {
        self.label
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Something that turns an encoded image into a label.
///
/// Exactly one attempt per call; implementations never retry. The payload is
/// consumed and dropped once the attempt finishes.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn submit(&self, payload: EncodedPayload) -> Result<PredictionResult, PredictionFailed>;
}
