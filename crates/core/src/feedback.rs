//! Feedback coordinator - exactly-once side effects from polled state.
//!
//! The engine is only ever observed by polling, so the same state is seen many
//! times. [`FeedbackCoordinator::observe`] folds each snapshot into the
//! recorded level and the session flags and fires side effects only on edges.
//! Sink failures are logged and swallowed here; gameplay never sees them.

use crate::host::{FeedbackError, FeedbackSink};
use crate::session::SessionFlags;
use crate::types::{
    Cue, EngineCommand, LockEvent, MusicCommand, Snapshot, HARD_DROP_PULSE_MS, LEVEL_UP_PULSE_MS,
};

/// Ambient music transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl MusicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicState::Stopped => "stopped",
            MusicState::Playing => "playing",
            MusicState::Paused => "paused",
        }
    }
}

/// Edges detected by one [`FeedbackCoordinator::observe`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transitions {
    /// New level, when it differs from the recorded one
    pub level_change: Option<u32>,
    pub game_over_entered: bool,
    pub game_over_cleared: bool,
}

impl Transitions {
    pub fn is_empty(&self) -> bool {
        self.level_change.is_none() && !self.game_over_entered && !self.game_over_cleared
    }
}

#[derive(Debug)]
pub struct FeedbackCoordinator<F: FeedbackSink> {
    sink: F,
    recorded_level: u32,
    music: MusicState,
    level_up_pulse_ms: u32,
    hard_drop_pulse_ms: u32,
}

impl<F: FeedbackSink> FeedbackCoordinator<F> {
    pub fn new(sink: F) -> Self {
        Self::with_pulses(sink, LEVEL_UP_PULSE_MS, HARD_DROP_PULSE_MS)
    }

    pub fn with_pulses(sink: F, level_up_pulse_ms: u32, hard_drop_pulse_ms: u32) -> Self {
        Self {
            sink,
            recorded_level: 1,
            music: MusicState::Stopped,
            level_up_pulse_ms,
            hard_drop_pulse_ms,
        }
    }

    pub fn level(&self) -> u32 {
        self.recorded_level
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Fold one polled snapshot into the recorded level and `flags`.
    pub fn observe(&mut self, snapshot: &Snapshot, flags: &mut SessionFlags) -> Transitions {
        let mut transitions = Transitions::default();

        if snapshot.level != self.recorded_level {
            log::debug!("level {} -> {}", self.recorded_level, snapshot.level);
            self.recorded_level = snapshot.level;
            self.pulse(self.level_up_pulse_ms);
            transitions.level_change = Some(snapshot.level);
        }

        flags.is_game_over = snapshot.game_over;
        if snapshot.game_over && !flags.game_over_announced {
            flags.game_over_announced = true;
            self.cue(Cue::GameOver);
            self.stop_music();
            transitions.game_over_entered = true;
        } else if !snapshot.game_over && flags.game_over_announced {
            flags.game_over_announced = false;
            transitions.game_over_cleared = true;
        }

        transitions
    }

    /// Side effects requested synchronously with an issued command.
    pub fn on_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::RotateCw | EngineCommand::RotateCcw => self.cue(Cue::Rotate),
            EngineCommand::Hold => self.cue(Cue::Hold),
            EngineCommand::HardDrop => self.pulse(self.hard_drop_pulse_ms),
            _ => {}
        }
    }

    /// One cue per lock: line clear if any lines went, otherwise a plain lock.
    pub fn on_lock_event(&mut self, event: LockEvent) {
        if event.lines_cleared > 0 {
            self.cue(Cue::LineClear);
        } else {
            self.cue(Cue::Lock);
        }
    }

    pub fn cue(&mut self, cue: Cue) {
        let result = self.sink.play_cue(cue);
        report(cue.as_str(), result);
    }

    fn pulse(&mut self, duration_ms: u32) {
        let result = self.sink.pulse(duration_ms);
        report("pulse", result);
    }

    /// Start (or restart) the ambient track.
    pub fn start_music(&mut self) {
        self.music = MusicState::Playing;
        let result = self.sink.music(MusicCommand::Start);
        report("music start", result);
    }

    pub fn stop_music(&mut self) {
        if self.music == MusicState::Stopped {
            return;
        }
        self.music = MusicState::Stopped;
        let result = self.sink.music(MusicCommand::Stop);
        report("music stop", result);
    }

    pub fn pause_music(&mut self) {
        if self.music != MusicState::Playing {
            return;
        }
        self.music = MusicState::Paused;
        let result = self.sink.music(MusicCommand::Pause);
        report("music pause", result);
    }

    pub fn resume_music(&mut self) {
        if self.music != MusicState::Paused {
            return;
        }
        self.music = MusicState::Playing;
        let result = self.sink.music(MusicCommand::Resume);
        report("music resume", result);
    }

    /// Forget the recorded level (restart).
    pub fn reset(&mut self) {
        self.recorded_level = 1;
    }
}

fn report(what: &str, result: Result<(), FeedbackError>) {
    if let Err(err) = result {
        log::debug!("feedback {what} dropped: {err}");
    }
}
