//! UI poll loop - fixed-cadence sampling of engine counters.

use crate::cadence::Cadence;
use crate::engine::{EngineHandle, SimulationEngine};
use crate::timer::RepeatTimer;
use crate::types::{Snapshot, UI_POLL_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct PollLoop {
    timer: RepeatTimer<()>,
    interval_ms: u64,
    latest: Option<Snapshot>,
}

impl PollLoop {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            timer: RepeatTimer::new(),
            interval_ms: interval_ms.max(1),
            latest: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Start sampling; the first sample is due immediately.
    ///
    /// Returns false if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.timer.start(now_ms, 0, self.interval_ms, ());
        true
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.due_at()
    }

    /// Whether a sample is due at `now_ms` (consumes the firing).
    pub fn fire(&mut self, now_ms: u64) -> bool {
        self.timer.fire(now_ms).is_some()
    }

    /// Query the engine and record the derived snapshot.
    ///
    /// Returns `None` when the engine is unavailable.
    pub fn sample<E: SimulationEngine>(
        &mut self,
        engine: &EngineHandle<E>,
        cadence: &Cadence,
    ) -> Option<Snapshot> {
        let readout = engine.read()?;
        let snapshot = Snapshot {
            score: readout.score,
            lines: readout.lines,
            level: cadence.level_for_lines(readout.lines),
            game_over: readout.game_over,
        };
        self.latest = Some(snapshot);
        Some(snapshot)
    }

    /// Most recent published snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

impl Default for PollLoop {
    fn default() -> Self {
        Self::new(UI_POLL_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineCommand;

    struct Counters {
        lines: u32,
    }

    impl SimulationEngine for Counters {
        fn apply(&mut self, _command: EngineCommand) {}
        fn score(&self) -> u32 {
            self.lines * 100
        }
        fn lines(&self) -> u32 {
            self.lines
        }
        fn is_game_over(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_first_sample_due_immediately_then_fixed_cadence() {
        let mut p = PollLoop::default();
        assert!(p.start(20));
        assert!(p.fire(20));
        assert!(!p.fire(119));
        assert!(p.fire(120));
    }

    #[test]
    fn test_double_start_keeps_schedule() {
        let mut p = PollLoop::default();
        p.start(0);
        assert!(!p.start(50));
        assert_eq!(p.next_due(), Some(0));
    }

    #[test]
    fn test_stop_disarms() {
        let mut p = PollLoop::default();
        p.start(0);
        p.stop();
        assert!(!p.is_running());
        assert!(!p.fire(1_000));
    }

    #[test]
    fn test_sample_derives_level() {
        let mut p = PollLoop::default();
        let engine = EngineHandle::create(Counters { lines: 23 });
        let snap = p.sample(&engine, &Cadence::default()).unwrap();
        assert_eq!(snap.level, 3);
        assert_eq!(snap.score, 2_300);
        assert_eq!(p.latest(), Some(&snap));
    }

    #[test]
    fn test_sample_without_engine_publishes_nothing() {
        let mut p = PollLoop::default();
        let engine: EngineHandle<Counters> = EngineHandle::detached();
        assert_eq!(p.sample(&engine, &Cadence::default()), None);
        assert_eq!(p.latest(), None);
    }
}
