//! Drop scheduler - the variable-cadence gravity loop.
//!
//! Each cycle issues one `Advance` and schedules the next cycle after the
//! cadence of the level passed in by the caller. The scheduler keeps no level of
//! its own, so drop speed always follows the most recently observed level.

use crate::cadence::Cadence;
use crate::timer::RepeatTimer;
use crate::types::EngineCommand;

/// Run state shared by the session loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Suspended,
}

#[derive(Debug, Clone)]
pub struct DropScheduler {
    state: LoopState,
    timer: RepeatTimer<()>,
    cadence: Cadence,
    last_interval_ms: Option<u64>,
}

impl DropScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            state: LoopState::Stopped,
            timer: RepeatTimer::new(),
            cadence,
            last_interval_ms: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.due_at()
    }

    /// Cadence used by the most recent (re)schedule.
    pub fn last_interval_ms(&self) -> Option<u64> {
        self.last_interval_ms
    }

    fn schedule(&mut self, from_ms: u64, level: u32) {
        let interval = self.cadence.interval_ms(level);
        self.last_interval_ms = Some(interval);
        self.timer.start_once(from_ms, interval, ());
    }

    /// Enter `Running` with an immediate tick.
    ///
    /// Returns the advance to issue, or `None` if already running.
    pub fn start(&mut self, now_ms: u64, level: u32) -> Option<EngineCommand> {
        if self.state == LoopState::Running {
            return None;
        }
        self.state = LoopState::Running;
        self.schedule(now_ms, level);
        Some(EngineCommand::Advance)
    }

    /// Tick if a cycle is due, then reschedule with the cadence for `level`.
    pub fn fire(&mut self, now_ms: u64, level: u32) -> Option<EngineCommand> {
        if self.state != LoopState::Running {
            return None;
        }
        let due = self.timer.due_at()?;
        self.timer.fire(now_ms)?;

        let interval = self.cadence.interval_ms(level);
        let from = if due + interval > now_ms { due } else { now_ms };
        self.schedule(from, level);
        Some(EngineCommand::Advance)
    }

    /// Cancel the pending cycle. Only a running scheduler can be suspended.
    pub fn suspend(&mut self) {
        if self.state == LoopState::Running {
            self.timer.stop();
            self.state = LoopState::Suspended;
        }
    }

    /// Schedule the next tick from `now_ms` using the current cadence.
    ///
    /// Returns true if the scheduler was suspended and is now running.
    pub fn resume(&mut self, now_ms: u64, level: u32) -> bool {
        if self.state != LoopState::Suspended {
            return false;
        }
        self.state = LoopState::Running;
        self.schedule(now_ms, level);
        true
    }

    /// Enter `Suspended` from `Stopped` without ticking, so a later `resume` starts it.
    pub fn park(&mut self) {
        if self.state == LoopState::Stopped {
            self.state = LoopState::Suspended;
        }
    }

    pub fn stop(&mut self) {
        self.timer.stop();
        self.state = LoopState::Stopped;
    }
}
