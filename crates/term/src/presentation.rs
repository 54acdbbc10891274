//! Terminal implementations of the session's host collaborators.
//!
//! Both write into one shared [`Hud`]; the host loop draws it.

use std::cell::RefCell;
use std::rc::Rc;

use tui_blockfall_core::{FeedbackError, FeedbackSink, MusicState, Presentation};

use crate::hud::Hud;
use crate::types::{Cue, MusicCommand, Overlay, Snapshot};

pub type SharedHud = Rc<RefCell<Hud>>;

pub fn shared_hud() -> SharedHud {
    Rc::new(RefCell::new(Hud::new()))
}

#[derive(Debug, Clone)]
pub struct TermPresentation {
    hud: SharedHud,
}

impl TermPresentation {
    pub fn new(hud: SharedHud) -> Self {
        Self { hud }
    }
}

impl Presentation for TermPresentation {
    fn publish(&mut self, snapshot: &Snapshot) {
        self.hud.borrow_mut().publish(snapshot);
    }

    fn set_overlay(&mut self, overlay: Overlay, visible: bool) {
        self.hud.borrow_mut().set_overlay(overlay, visible);
    }
}

/// Cues become HUD labels plus an optional terminal bell. A terminal has no
/// haptics, so pulses always fail with [`FeedbackError::Unavailable`].
#[derive(Debug, Clone)]
pub struct TermFeedback {
    hud: SharedHud,
    bell: bool,
}

impl TermFeedback {
    pub fn new(hud: SharedHud, bell: bool) -> Self {
        Self { hud, bell }
    }
}

impl FeedbackSink for TermFeedback {
    fn play_cue(&mut self, cue: Cue) -> Result<(), FeedbackError> {
        let mut hud = self.hud.borrow_mut();
        hud.last_cue = Some(cue);
        hud.dirty = true;
        if self.bell && matches!(cue, Cue::LineClear | Cue::GameOver) {
            hud.bells_pending += 1;
        }
        Ok(())
    }

    fn pulse(&mut self, _duration_ms: u32) -> Result<(), FeedbackError> {
        self.hud.borrow_mut().pulses_dropped += 1;
        Err(FeedbackError::Unavailable("haptics"))
    }

    fn music(&mut self, command: MusicCommand) -> Result<(), FeedbackError> {
        let mut hud = self.hud.borrow_mut();
        hud.music = match command {
            MusicCommand::Start | MusicCommand::Resume => MusicState::Playing,
            MusicCommand::Pause => MusicState::Paused,
            MusicCommand::Stop => MusicState::Stopped,
        };
        hud.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_writes_hud() {
        let hud = shared_hud();
        let mut p = TermPresentation::new(hud.clone());
        p.set_overlay(Overlay::GameOver, true);
        p.publish(&Snapshot {
            score: 10,
            lines: 1,
            level: 1,
            game_over: true,
        });
        assert!(hud.borrow().game_over);
        assert_eq!(hud.borrow().snapshot.score, 10);
    }

    #[test]
    fn test_bell_only_for_loud_cues_when_enabled() {
        let hud = shared_hud();
        let mut f = TermFeedback::new(hud.clone(), true);
        f.play_cue(Cue::Rotate).unwrap();
        f.play_cue(Cue::LineClear).unwrap();
        f.play_cue(Cue::GameOver).unwrap();
        assert_eq!(hud.borrow_mut().take_bells(), 2);
        assert_eq!(hud.borrow().last_cue, Some(Cue::GameOver));

        let mut quiet = TermFeedback::new(hud.clone(), false);
        quiet.play_cue(Cue::LineClear).unwrap();
        assert_eq!(hud.borrow_mut().take_bells(), 0);
    }

    #[test]
    fn test_pulse_is_unavailable() {
        let hud = shared_hud();
        let mut f = TermFeedback::new(hud.clone(), true);
        assert_eq!(f.pulse(100), Err(FeedbackError::Unavailable("haptics")));
        assert_eq!(hud.borrow().pulses_dropped, 1);
    }

    #[test]
    fn test_music_commands_update_label() {
        let hud = shared_hud();
        let mut f = TermFeedback::new(hud.clone(), false);
        f.music(MusicCommand::Start).unwrap();
        f.music(MusicCommand::Pause).unwrap();
        assert_eq!(hud.borrow().music, MusicState::Paused);
        f.music(MusicCommand::Stop).unwrap();
        assert_eq!(hud.borrow().music, MusicState::Stopped);
    }
}
