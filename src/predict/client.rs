//! HttpPredictionClient - posts the payload to the classification service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::error::PredictionFailed;
use super::types::{PredictionClient, PredictionResult};
use crate::config::Config;
use crate::preprocess::EncodedPayload;

/// Path of the classification endpoint, relative to the base URL.
pub const PREDICT_PATH: &str = "/predict";

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Default timeout for the whole request (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Successful response body.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predicted_class: Option<String>,
}

/// Client for the remote classification endpoint.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpPredictionClient {
    /// Create a client for the configured base URL.
    pub fn new(config: &Config) -> Result<Self, PredictionFailed> {
        Self::with_base_url(config.base_url.clone())
    }

    /// Create a client with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, PredictionFailed> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(PredictionFailed::network)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the classification endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// Upload the payload and return the predicted label.
    ///
    /// One multipart POST with a single `file` part. No retry.
    ///
    /// # Errors
    ///
    /// Returns `PredictionFailed` on a network failure, a non-2xx status, a
    /// body that is not JSON, or a JSON body without a non-empty
    /// `predicted_class` string.
    pub async fn predict(&self, payload: EncodedPayload) -> Result<PredictionResult, PredictionFailed> {
        let url = self.predict_url();
        let file_name = payload.file_name();
        let mime_type = payload.mime_type();
        let size = payload.len();

        let part = Part::bytes(payload.into_bytes())
            .file_name(file_name)
            .mime_str(mime_type)
            .map_err(PredictionFailed::network)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        log::debug!("Submitting {} byte {} payload to {}", size, mime_type, url);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(PredictionFailed::network)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("Classifier returned {}: {}", status, error_text);
            return Err(PredictionFailed::status(status.as_u16(), error_text));
        }

        let body = response.bytes().await.map_err(|e| PredictionFailed {
            status: Some(status.as_u16()),
            cause: e.into(),
        })?;

        let parsed: PredictResponse = serde_json::from_slice(&body)
            .map_err(|e| PredictionFailed::malformed(Some(status.as_u16()), e.to_string()))?;

        match parsed.predicted_class {
            Some(label) if !label.is_empty() => {
                log::info!("Classifier predicted '{}'", label);
                Ok(PredictionResult::new(label))
            }
            _ => Err(PredictionFailed::missing_label(Some(status.as_u16()))),
        }
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn submit(&self, payload: EncodedPayload) -> Result<PredictionResult, PredictionFailed> {
        self.predict(payload).await
    }
}
