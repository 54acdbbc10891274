//! Simulation engine seam.
//!
//! The falling-block simulation itself lives behind [`SimulationEngine`]. The
//! session only ever reaches it through an [`EngineHandle`], which turns the
//! "not created yet" and "already torn down" windows into silent no-ops.

use crate::types::{EngineCommand, LockEvent, SurfaceEvent};

/// Command/query interface of the external simulation.
///
/// Commands are fire-and-forget. Queries must reflect every command applied
/// before them (no buffering delay).
pub trait SimulationEngine {
    fn apply(&mut self, command: EngineCommand);

    fn score(&self) -> u32;

    fn lines(&self) -> u32;

    fn is_game_over(&self) -> bool;

    /// Take and clear the last lock event.
    fn take_last_event(&mut self) -> Option<LockEvent> {
        None
    }

    /// Render-side surface lifecycle (not driven by the session loops).
    fn surface(&mut self, _event: SurfaceEvent) {}
}

/// Raw counters read from the engine in one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readout {
    pub score: u32,
    pub lines: u32,
    pub game_over: bool,
}

/// Exclusive owner of the engine for one session.
///
/// `Initialize` is issued on creation and `Teardown` exactly once, on
/// [`EngineHandle::release`] or on drop, whichever comes first.
#[derive(Debug)]
pub struct EngineHandle<E: SimulationEngine> {
    engine: Option<E>,
}

impl<E: SimulationEngine> EngineHandle<E> {
    pub fn create(mut engine: E) -> Self {
        engine.apply(EngineCommand::Initialize);
        Self {
            engine: Some(engine),
        }
    }

    /// A handle with no engine behind it (before start, after teardown).
    pub fn detached() -> Self {
        Self { engine: None }
    }

    pub fn is_live(&self) -> bool {
        self.engine.is_some()
    }

    /// Forward a command. Returns false when the engine is unavailable.
    pub fn command(&mut self, command: EngineCommand) -> bool {
        match self.engine.as_mut() {
            Some(engine) => {
                engine.apply(command);
                true
            }
            None => {
                log::trace!("engine unavailable, dropping {}", command.as_str());
                false
            }
        }
    }

    pub fn read(&self) -> Option<Readout> {
        self.engine.as_ref().map(|engine| Readout {
            score: engine.score(),
            lines: engine.lines(),
            game_over: engine.is_game_over(),
        })
    }

    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.engine.as_mut()?.take_last_event()
    }

    pub fn surface(&mut self, event: SurfaceEvent) {
        if let Some(engine) = self.engine.as_mut() {
            engine.surface(event);
        }
    }

    /// Tear the engine down. Returns false if it was already released.
    pub fn release(&mut self) -> bool {
        match self.engine.take() {
            Some(mut engine) => {
                engine.apply(EngineCommand::Teardown);
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> Option<&E> {
        self.engine.as_ref()
    }
}

impl<E: SimulationEngine> Drop for EngineHandle<E> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        commands: Vec<EngineCommand>,
    }

    struct Probe {
        log: Rc<RefCell<Log>>,
    }

    impl SimulationEngine for Probe {
        fn apply(&mut self, command: EngineCommand) {
            self.log.borrow_mut().commands.push(command);
        }
        fn score(&self) -> u32 {
            7
        }
        fn lines(&self) -> u32 {
            3
        }
        fn is_game_over(&self) -> bool {
            false
        }
    }

    fn probe() -> (Probe, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (Probe { log: log.clone() }, log)
    }

    #[test]
    fn test_create_initializes_engine() {
        let (engine, log) = probe();
        let handle = EngineHandle::create(engine);
        assert!(handle.is_live());
        assert_eq!(log.borrow().commands, vec![EngineCommand::Initialize]);
    }

    #[test]
    fn test_release_tears_down_exactly_once() {
        let (engine, log) = probe();
        let mut handle = EngineHandle::create(engine);
        assert!(handle.release());
        assert!(!handle.release());
        drop(handle);

        let teardowns = log
            .borrow()
            .commands
            .iter()
            .filter(|c| **c == EngineCommand::Teardown)
            .count();
        assert_eq!(teardowns, 1);
    }

    #[test]
    fn test_drop_releases_live_engine() {
        let (engine, log) = probe();
        drop(EngineHandle::create(engine));
        assert_eq!(
            log.borrow().commands.last(),
            Some(&EngineCommand::Teardown)
        );
    }

    #[test]
    fn test_detached_handle_drops_commands_and_reads_nothing() {
        let mut handle: EngineHandle<Probe> = EngineHandle::detached();
        assert!(!handle.command(EngineCommand::Advance));
        assert_eq!(handle.read(), None);
        assert_eq!(handle.take_last_event(), None);
    }

    #[test]
    fn test_read_returns_counters() {
        let (engine, _log) = probe();
        let handle = EngineHandle::create(engine);
        assert_eq!(
            handle.read(),
            Some(Readout {
                score: 7,
                lines: 3,
                game_over: false
            })
        );
    }
}
