//! Capture session state machine.
//!
//! [`CaptureController`] owns the only mutable session state:
//!
//! ```text
//! Idle → Capturing → AwaitingResult → ShowingResult | Error
//!   ↑                                        │
//!   └──────────────── reset() ───────────────┘
//! ```
//!
//! `capture()` from `ShowingResult` or `Error` resets implicitly and starts
//! over. Presentation layers follow along through [`SessionView`] updates.

mod capture;
mod state;

pub use capture::{CaptureController, CaptureOutcome, PipelineError};
pub use state::{SessionState, SessionView, ERROR_INDICATOR};
