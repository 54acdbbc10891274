//! Host collaborators: presentation layer and feedback outputs.

use thiserror::Error;

use crate::types::{Cue, MusicCommand, Overlay, Snapshot};

/// Receives published snapshots and overlay toggles.
pub trait Presentation {
    fn publish(&mut self, snapshot: &Snapshot);

    fn set_overlay(&mut self, overlay: Overlay, visible: bool);
}

/// Why a feedback output could not be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("{0} output unavailable")]
    Unavailable(&'static str),
    #[error("{0} output busy")]
    Busy(&'static str),
}

/// Best-effort audio/haptic outputs.
pub trait FeedbackSink {
    fn play_cue(&mut self, cue: Cue) -> Result<(), FeedbackError>;

    /// Tactile pulse of `duration_ms`.
    fn pulse(&mut self, duration_ms: u32) -> Result<(), FeedbackError>;

    fn music(&mut self, command: MusicCommand) -> Result<(), FeedbackError>;
}

/// Presentation that discards everything (headless runs, benches).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn publish(&mut self, _snapshot: &Snapshot) {}

    fn set_overlay(&mut self, _overlay: Overlay, _visible: bool) {}
}

/// Feedback sink with no outputs; every request succeeds silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn play_cue(&mut self, _cue: Cue) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn pulse(&mut self, _duration_ms: u32) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn music(&mut self, _command: MusicCommand) -> Result<(), FeedbackError> {
        Ok(())
    }
}
