//! Offline stand-in for the classification service.
//!
//! Waits a little, then answers with a random mood. Used for demos without a
//! running classifier and for exercising the controller deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::error::PredictionFailed;
use super::types::{PredictionClient, PredictionResult};
use crate::preprocess::EncodedPayload;

/// Labels the mock answers with by default.
pub const DEFAULT_MOODS: [&str; 3] = ["Feliz 😀", "Triste 😢", "Neutral 😐"];

/// Simulated analysis time.
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1200);

/// Random-label prediction client.
#[derive(Debug)]
pub struct MockPredictionClient {
    labels: Vec<String>,
    delay: Duration,
    failure_status: Option<u16>,
    rng: Mutex<StdRng>,
    submissions: AtomicUsize,
}

impl MockPredictionClient {
    /// Mock with the default moods, default delay and an OS-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Mock with a fixed seed, so the label sequence is reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            labels: DEFAULT_MOODS.iter().map(|m| m.to_string()).collect(),
            delay: DEFAULT_MOCK_DELAY,
            failure_status: None,
            rng: Mutex::new(rng),
            submissions: AtomicUsize::new(0),
        }
    }

    /// Replace the label set.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the simulated delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer every submission with the given HTTP status instead of a label.
    pub fn failing_with(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    /// Number of payloads submitted so far.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    fn pick_label(&self) -> Option<String> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        self.labels.choose(&mut *rng).cloned()
    }
}

impl Default for MockPredictionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionClient for MockPredictionClient {
    async fn submit(&self, payload: EncodedPayload) -> Result<PredictionResult, PredictionFailed> {
        let count = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!(
            "Mock classifier received payload #{} ({} bytes)",
            count,
            payload.len()
        );
        drop(payload);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(status) = self.failure_status {
            return Err(PredictionFailed::status(status, "mock classifier failure"));
        }

        self.pick_label()
            .map(PredictionResult::new)
            .ok_or_else(|| PredictionFailed::missing_label(Some(200)))
    }
}
