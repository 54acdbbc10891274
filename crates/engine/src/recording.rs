//! Scriptable engine that records commands.
//!
//! The engine and its [`EngineProbe`] share state, so a test can hand the
//! engine to a session and keep the probe to script counters and inspect the
//! command log afterwards (including after the session dropped the engine).

use std::cell::RefCell;
use std::rc::Rc;

use tui_blockfall_core::SimulationEngine;

use crate::types::{EngineCommand, LockEvent, SurfaceEvent};

#[derive(Debug, Default)]
struct Shared {
    commands: Vec<EngineCommand>,
    surface_events: Vec<SurfaceEvent>,
    score: u32,
    lines: u32,
    game_over: bool,
    pending_events: Vec<LockEvent>,
}

#[derive(Debug)]
pub struct RecordingEngine {
    shared: Rc<RefCell<Shared>>,
}

/// Test-side view of a [`RecordingEngine`].
#[derive(Debug, Clone)]
pub struct EngineProbe {
    shared: Rc<RefCell<Shared>>,
}

impl RecordingEngine {
    pub fn new() -> (Self, EngineProbe) {
        let shared = Rc::new(RefCell::new(Shared::default()));
        (
            Self {
                shared: shared.clone(),
            },
            EngineProbe { shared },
        )
    }
}

impl SimulationEngine for RecordingEngine {
    fn apply(&mut self, command: EngineCommand) {
        let mut shared = self.shared.borrow_mut();
        shared.commands.push(command);
        if command == EngineCommand::Reset {
            shared.score = 0;
            shared.lines = 0;
            shared.game_over = false;
            shared.pending_events.clear();
        }
    }

    fn score(&self) -> u32 {
        self.shared.borrow().score
    }

    fn lines(&self) -> u32 {
        self.shared.borrow().lines
    }

    fn is_game_over(&self) -> bool {
        self.shared.borrow().game_over
    }

    fn take_last_event(&mut self) -> Option<LockEvent> {
        let mut shared = self.shared.borrow_mut();
        if shared.pending_events.is_empty() {
            None
        } else {
            Some(shared.pending_events.remove(0))
        }
    }

    fn surface(&mut self, event: SurfaceEvent) {
        self.shared.borrow_mut().surface_events.push(event);
    }
}

impl EngineProbe {
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.shared.borrow().commands.clone()
    }

    /// How many times `command` was applied.
    pub fn count(&self, command: EngineCommand) -> usize {
        self.shared
            .borrow()
            .commands
            .iter()
            .filter(|c| **c == command)
            .count()
    }

    pub fn surface_events(&self) -> Vec<SurfaceEvent> {
        self.shared.borrow().surface_events.clone()
    }

    pub fn clear_commands(&self) {
        self.shared.borrow_mut().commands.clear();
    }

    pub fn set_score(&self, score: u32) {
        self.shared.borrow_mut().score = score;
    }

    pub fn set_lines(&self, lines: u32) {
        self.shared.borrow_mut().lines = lines;
    }

    pub fn set_game_over(&self, game_over: bool) {
        self.shared.borrow_mut().game_over = game_over;
    }

    /// Queue a lock event for the next gravity command to drain.
    pub fn push_event(&self, event: LockEvent) {
        self.shared.borrow_mut().pending_events.push(event);
    }
}
