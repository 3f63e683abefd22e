//! Session state and the observable view published on every transition.

use std::fmt;

/// Text shown instead of a label when the last attempt failed.
pub const ERROR_INDICATOR: &str = "Error";

/// Where the capture session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing captured, ready for a capture.
    #[default]
    Idle,
    /// Snapshot taken, preprocessing in progress.
    Capturing,
    /// Payload submitted, waiting for the classifier.
    AwaitingResult,
    /// A label is available.
    ShowingResult,
    /// The last attempt failed.
    Error,
}

impl SessionState {
    /// True while a capture is in flight. New captures are rejected.
    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::Capturing | SessionState::AwaitingResult)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Capturing => "capturing",
            SessionState::AwaitingResult => "awaiting result",
            SessionState::ShowingResult => "showing result",
            SessionState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Snapshot of the session a presentation layer can render from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub state: SessionState,
    /// Generation of the most recent capture attempt
    pub generation: u64,
    /// Current label, only in `ShowingResult`
    pub label: Option<String>,
    /// Description of the last failure, only in `Error`
    pub error: Option<String>,
}

impl SessionView {
    /// Whether a busy indicator should be shown.
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// Text for the result area: the label, the error indicator, or nothing.
    pub fn display_text(&self) -> Option<&str> {
        match self.state {
            SessionState::ShowingResult => self.label.as_deref(),
            SessionState::Error => Some(ERROR_INDICATOR),
            _ => None,
        }
    }
}
