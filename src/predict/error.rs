//! Prediction error type shared by every client implementation.

/// The single error a prediction attempt can end with.
///
/// Carries the HTTP status when the server answered, and the underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("Prediction failed: {cause}")]
pub struct PredictionFailed {
    /// HTTP status code, if a response was received
    pub status: Option<u16>,
    /// What went wrong
    #[source]
    pub cause: PredictionCause,
}

/// Underlying reason for a [`PredictionFailed`].
#[derive(Debug, thiserror::Error)]
pub enum PredictionCause {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Status {
        /// Non-2xx status code
        status: u16,
        /// Response body, or a placeholder if it could not be read
        body: String,
    },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Response has no predicted_class label")]
    MissingLabel,
}

impl PredictionFailed {
    /// Transport-level failure, no response status.
    pub fn network(error: reqwest::Error) -> Self {
        Self {
            status: error.status().map(|s| s.as_u16()),
            cause: PredictionCause::Network(error),
        }
    }

    /// The server answered with a non-2xx status.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            cause: PredictionCause::Status {
                status,
                body: body.into(),
            },
        }
    }

    /// The body was not the expected JSON document.
    pub fn malformed(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status,
            cause: PredictionCause::Malformed(reason.into()),
        }
    }

    /// The JSON document had no usable label.
    pub fn missing_label(status: Option<u16>) -> Self {
        Self {
            status,
            cause: PredictionCause::MissingLabel,
        }
    }
}
