//! Error types for snapshot preprocessing.

use super::encode::PayloadFormat;

/// Errors that end the current capture attempt during preprocessing.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("Drawing surface unavailable: {reason}")]
    RenderContextUnavailable {
        /// Why the raw capture could not be drawn
        reason: String,
    },

    #[error("Failed to encode {format} payload: {reason}")]
    EncodeFailed {
        /// Target encoding
        format: PayloadFormat,
        /// Encoder error message
        reason: String,
    },
}
