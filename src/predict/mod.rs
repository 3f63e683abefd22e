//! Remote classification.
//!
//! The controller only sees the [`PredictionClient`] trait. Two
//! implementations ship with the crate:
//! - [`HttpPredictionClient`] posts the payload to `{base_url}/predict`
//! - [`MockPredictionClient`] answers locally with a random mood

mod client;
mod error;
mod mock;
mod types;

pub use client::{HttpPredictionClient, PREDICT_PATH, UPLOAD_FIELD};
pub use error::{PredictionCause, PredictionFailed};
pub use mock::{MockPredictionClient, DEFAULT_MOCK_DELAY, DEFAULT_MOODS};
pub use types::{PredictionClient, PredictionResult};
