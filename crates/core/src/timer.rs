//! Cancellable repeating timer driven by a host-supplied millisecond clock.
//!
//! A `RepeatTimer` holds at most one armed task. Starting it again replaces the
//! armed task, so one timer per control (or loop) is enough to guarantee there is
//! never more than one live repeat for it.

/// Identifies one armed instance of a [`RepeatTimer`].
///
/// Handles go stale when the timer is cancelled, restarted, or a one-shot fires.
/// Cancelling a stale handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatHandle {
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed<T> {
    task: T,
    due_ms: u64,
    interval_ms: Option<u64>,
    generation: u32,
}

#[derive(Debug, Clone)]
pub struct RepeatTimer<T> {
    armed: Option<Armed<T>>,
    generation: u32,
}

impl<T: Copy> RepeatTimer<T> {
    pub fn new() -> Self {
        Self {
            armed: None,
            generation: 0,
        }
    }

    /// Arm `task` to fire after `initial_delay_ms`, then every `interval_ms`.
    ///
    /// Any task already armed is cancelled first.
    pub fn start(
        &mut self,
        now_ms: u64,
        initial_delay_ms: u64,
        interval_ms: u64,
        task: T,
    ) -> RepeatHandle {
        self.arm(now_ms + initial_delay_ms, Some(interval_ms.max(1)), task)
    }

    /// Arm `task` to fire once after `delay_ms`.
    pub fn start_once(&mut self, now_ms: u64, delay_ms: u64, task: T) -> RepeatHandle {
        self.arm(now_ms + delay_ms, None, task)
    }

    fn arm(&mut self, due_ms: u64, interval_ms: Option<u64>, task: T) -> RepeatHandle {
        self.generation = self.generation.wrapping_add(1);
        self.armed = Some(Armed {
            task,
            due_ms,
            interval_ms,
            generation: self.generation,
        });
        RepeatHandle {
            generation: self.generation,
        }
    }

    /// Cancel the instance identified by `handle`.
    ///
    /// Returns true if that instance was still armed.
    pub fn cancel(&mut self, handle: RepeatHandle) -> bool {
        match self.armed {
            Some(armed) if armed.generation == handle.generation => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    /// Cancel whatever is armed.
    pub fn stop(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn is_live(&self, handle: RepeatHandle) -> bool {
        self.armed
            .map(|armed| armed.generation == handle.generation)
            .unwrap_or(false)
    }

    /// Task of the armed instance, if any.
    pub fn task(&self) -> Option<T> {
        self.armed.map(|armed| armed.task)
    }

    /// Next firing time, if armed.
    pub fn due_at(&self) -> Option<u64> {
        self.armed.map(|armed| armed.due_ms)
    }

    /// Fire the armed task if it is due at `now_ms`.
    ///
    /// Repeating timers are re-armed before the task is handed out, so a
    /// cancellation issued while dispatching the task stops the next firing.
    /// A firing that is late by more than one interval re-arms from `now_ms`;
    /// missed repetitions are skipped rather than replayed.
    pub fn fire(&mut self, now_ms: u64) -> Option<T> {
        let armed = self.armed.as_mut()?;
        if armed.due_ms > now_ms {
            return None;
        }

        let task = armed.task;
        match armed.interval_ms {
            Some(interval) => {
                let next = armed.due_ms + interval;
                armed.due_ms = if next > now_ms { next } else { now_ms + interval };
            }
            None => self.armed = None,
        }
        Some(task)
    }
}

impl<T: Copy> Default for RepeatTimer<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_initial_delay_then_every_interval() {
        let mut t = RepeatTimer::new();
        t.start(0, 100, 50, 'x');

        assert_eq!(t.fire(99), None);
        assert_eq!(t.fire(100), Some('x'));
        assert_eq!(t.due_at(), Some(150));
        assert_eq!(t.fire(149), None);
        assert_eq!(t.fire(150), Some('x'));
        assert_eq!(t.due_at(), Some(200));
    }

    #[test]
    fn test_zero_delay_fires_immediately() {
        let mut t = RepeatTimer::new();
        t.start(40, 0, 100, ());
        assert_eq!(t.fire(40), Some(()));
        assert_eq!(t.due_at(), Some(140));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut t = RepeatTimer::new();
        let h = t.start(0, 10, 10, 1u8);
        assert!(t.cancel(h));
        assert!(!t.cancel(h));
        assert!(!t.is_armed());
        assert_eq!(t.fire(1_000), None);
    }

    #[test]
    fn test_stale_handle_does_not_cancel_newer_instance() {
        let mut t = RepeatTimer::new();
        let old = t.start(0, 10, 10, 'a');
        let new = t.start(5, 10, 10, 'b');

        assert!(!t.is_live(old));
        assert!(!t.cancel(old));
        assert!(t.is_live(new));
        assert_eq!(t.task(), Some('b'));
    }

    #[test]
    fn test_restart_replaces_armed_task() {
        let mut t = RepeatTimer::new();
        t.start(0, 10, 10, 'a');
        t.start(0, 30, 10, 'b');

        assert_eq!(t.fire(10), None, "old instance must not fire");
        assert_eq!(t.fire(30), Some('b'));
    }

    #[test]
    fn test_one_shot_disarms_and_cancel_after_fire_is_safe() {
        let mut t = RepeatTimer::new();
        let h = t.start_once(0, 20, ());
        assert_eq!(t.fire(20), Some(()));
        assert!(!t.is_armed());
        assert!(!t.cancel(h));
        assert_eq!(t.fire(100), None);
    }

    #[test]
    fn test_late_firing_skips_missed_repetitions() {
        let mut t = RepeatTimer::new();
        t.start(0, 100, 100, ());

        // Host stalled until 450: exactly one firing, re-armed from now.
        assert_eq!(t.fire(450), Some(()));
        assert_eq!(t.fire(450), None);
        assert_eq!(t.due_at(), Some(550));
    }

    #[test]
    fn test_slightly_late_firing_keeps_schedule() {
        let mut t = RepeatTimer::new();
        t.start(0, 100, 100, ());
        assert_eq!(t.fire(103), Some(()));
        assert_eq!(t.due_at(), Some(200));
    }

    #[test]
    fn test_cancel_during_dispatch_prevents_next_firing() {
        let mut t = RepeatTimer::new();
        let h = t.start(0, 0, 100, ());
        assert_eq!(t.fire(0), Some(()));
        // The dispatched action cancels its own timer.
        assert!(t.cancel(h));
        assert_eq!(t.fire(100), None);
    }
}
