//! CaptureController - drives one capture from snapshot to label.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use super::state::{SessionState, SessionView};
use crate::camera::{RawCapture, SnapshotSource};
use crate::predict::{PredictionClient, PredictionFailed, PredictionResult};
use crate::preprocess::{ImagePreprocessor, NormalizedImage, PreprocessError};

/// Any failure of a capture attempt.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Prediction(#[from] PredictionFailed),
}

/// How a call to [`CaptureController::capture`] ended.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The classifier answered and the label is now shown.
    Completed(PredictionResult),
    /// Preprocessing or prediction failed; the session is in `Error`.
    Failed(PipelineError),
    /// The snapshot source had no frame. Nothing changed.
    NotReady,
    /// Another capture is in flight. Nothing changed.
    Busy,
    /// A reset or newer capture replaced this attempt while it was waiting;
    /// its response was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    generation: u64,
    raw: Option<RawCapture>,
    normalized: Option<NormalizedImage>,
    result: Option<PredictionResult>,
    error: Option<String>,
}

impl Session {
    fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.raw = None;
        self.normalized = None;
        self.result = None;
        self.error = None;
    }

    fn view(&self) -> SessionView {
        SessionView {
            state: self.state,
            generation: self.generation,
            label: self.result.as_ref().map(|r| r.label().to_string()),
            error: self.error.clone(),
        }
    }
}

/// Orchestrates snapshot → preprocess → submit and owns the session state.
///
/// At most one capture is in flight. Each attempt is tagged with a
/// generation number; a response that arrives after a reset or a newer
/// capture no longer matches and is dropped.
///
/// Every state change is published on a watch channel, see
/// [`CaptureController::subscribe`].
pub struct CaptureController {
    source: Arc<dyn SnapshotSource>,
    preprocessor: ImagePreprocessor,
    client: Arc<dyn PredictionClient>,
    session: Mutex<Session>,
    events: watch::Sender<SessionView>,
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("preprocessor", &self.preprocessor)
            .field("view", &self.view())
            .finish_non_exhaustive()
    }
}

impl CaptureController {
    /// Create a controller with the default preprocessor (JPEG, quality 0.9).
    pub fn new(source: Arc<dyn SnapshotSource>, client: Arc<dyn PredictionClient>) -> Self {
        let (events, _) = watch::channel(SessionView::default());
        Self {
            source,
            preprocessor: ImagePreprocessor::new(),
            client,
            session: Mutex::new(Session::default()),
            events,
        }
    }

    /// Replace the preprocessor.
    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Receive a [`SessionView`] after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.events.subscribe()
    }

    pub fn view(&self) -> SessionView {
        self.lock().view()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn result(&self) -> Option<PredictionResult> {
        self.lock().result.clone()
    }

    pub fn raw_capture(&self) -> Option<RawCapture> {
        self.lock().raw.clone()
    }

    pub fn normalized_image(&self) -> Option<NormalizedImage> {
        self.lock().normalized.clone()
    }

    /// Take a snapshot, preprocess it and ask the classifier for a label.
    ///
    /// Rejected with [`CaptureOutcome::Busy`] while another capture is in
    /// flight, and a no-op ([`CaptureOutcome::NotReady`]) when the source has
    /// no frame. From `ShowingResult` or `Error` the previous result is
    /// cleared first. Failures never escape: they move the session to
    /// `Error` and come back as [`CaptureOutcome::Failed`].
    ///
    /// The session lock is released while the snapshot source and the
    /// preprocessor run, so both may call back into the controller.
    pub async fn capture(&self) -> CaptureOutcome {
        if self.lock().state.is_busy() {
            log::debug!("Capture rejected, session is busy");
            return CaptureOutcome::Busy;
        }

        let Some(raw) = self.source.snapshot() else {
            log::debug!("Snapshot source not ready, ignoring capture");
            return CaptureOutcome::NotReady;
        };

        let generation = {
            let mut session = self.lock();
            if session.state.is_busy() {
                log::debug!("Capture rejected, session is {}", session.state);
                return CaptureOutcome::Busy;
            }
            if session.state != SessionState::Idle {
                session.clear();
            }
            session.generation += 1;
            session.state = SessionState::Capturing;
            self.publish(&session);
            session.generation
        };

        // Let subscribers see Capturing before preprocessing replaces it
        tokio::task::yield_now().await;

        let processed = self.preprocessor.process(&raw);
        let resolution = raw.resolution();
        let age = raw.timestamp.elapsed();

        let payload = {
            let mut session = self.lock();
            if session.generation != generation {
                log::debug!("Capture #{} reset during preprocessing", generation);
                return CaptureOutcome::Superseded;
            }
            session.raw = Some(raw);

            match processed {
                Ok((normalized, payload)) => {
                    session.normalized = Some(normalized);
                    session.state = SessionState::AwaitingResult;
                    self.publish(&session);
                    payload
                }
                Err(e) => return self.fail(&mut session, e.into()),
            }
        };

        log::info!(
            "Submitting capture #{} ({} snapshot, taken {:?} ago)",
            generation,
            resolution,
            age
        );
        let result = self.client.submit(payload).await;

        let mut session = self.lock();
        if session.generation != generation {
            log::debug!(
                "Discarding response for capture #{} (current is #{})",
                generation,
                session.generation
            );
            return CaptureOutcome::Superseded;
        }

        match result {
            Ok(prediction) => {
                session.result = Some(prediction.clone());
                session.state = SessionState::ShowingResult;
                self.publish(&session);
                CaptureOutcome::Completed(prediction)
            }
            Err(e) => self.fail(&mut session, e.into()),
        }
    }

    /// Drop everything derived from the last capture and return to `Idle`.
    ///
    /// Allowed from any state. A capture still waiting on the classifier
    /// becomes stale and its response is ignored.
    pub fn reset(&self) {
        let mut session = self.lock();
        session.clear();
        session.generation += 1;
        log::debug!("Session reset (generation {})", session.generation);
        self.publish(&session);
    }

    fn fail(&self, session: &mut Session, error: PipelineError) -> CaptureOutcome {
        log::warn!("Capture #{} failed: {}", session.generation, error);
        session.error = Some(error.to_string());
        session.state = SessionState::Error;
        self.publish(session);
        CaptureOutcome::Failed(error)
    }

    fn publish(&self, session: &Session) {
        self.events.send_replace(session.view());
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
