//! Input controller - press/hold/release to engine commands.
//!
//! Movement and soft drop issue their command on press and then repeat every
//! `repeat_interval_ms` while held. Left and right share one horizontal repeat
//! timer, so pressing one direction supersedes the other. Everything else is
//! single-shot.

use arrayvec::ArrayVec;

use crate::timer::{RepeatHandle, RepeatTimer};
use crate::types::{Control, EngineCommand, REPEAT_INTERVAL_MS};

#[derive(Debug, Clone)]
pub struct InputController {
    horizontal: RepeatTimer<Control>,
    soft_drop: RepeatTimer<Control>,
    /// Handle of each control's live repeat, indexed by `Control::index`.
    held: [Option<RepeatHandle>; Control::ALL.len()],
    repeat_interval_ms: u64,
}

impl InputController {
    pub fn new() -> Self {
        Self::with_interval(REPEAT_INTERVAL_MS)
    }

    pub fn with_interval(repeat_interval_ms: u64) -> Self {
        Self {
            horizontal: RepeatTimer::new(),
            soft_drop: RepeatTimer::new(),
            held: [None; Control::ALL.len()],
            repeat_interval_ms: repeat_interval_ms.max(1),
        }
    }

    fn timer_mut(&mut self, control: Control) -> Option<&mut RepeatTimer<Control>> {
        match control {
            Control::MoveLeft | Control::MoveRight => Some(&mut self.horizontal),
            Control::SoftDrop => Some(&mut self.soft_drop),
            _ => None,
        }
    }

    /// Start of a press. Returns the command to issue right away.
    ///
    /// Repeating controls also arm their repeat timer, replacing any repeat
    /// already live for the same or a conflicting control.
    pub fn on_press_start(&mut self, control: Control, now_ms: u64) -> EngineCommand {
        if control.is_repeating() {
            if let Some(other) = control.conflicting() {
                self.cancel_held(other);
            }
            let interval = self.repeat_interval_ms;
            let handle = self
                .timer_mut(control)
                .map(|timer| timer.start(now_ms, interval, interval, control));
            self.held[control.index()] = handle;
        }
        control.command()
    }

    /// End of a press. Never issues a command.
    pub fn on_press_end(&mut self, control: Control) {
        self.cancel_held(control);
    }

    fn cancel_held(&mut self, control: Control) {
        if let Some(handle) = self.held[control.index()].take() {
            if let Some(timer) = self.timer_mut(control) {
                timer.cancel(handle);
            }
        }
    }

    /// Drop every live repeat (suspension, focus loss, teardown).
    pub fn release_all(&mut self) {
        self.horizontal.stop();
        self.soft_drop.stop();
        self.held = [None; Control::ALL.len()];
    }

    pub fn is_repeating(&self, control: Control) -> bool {
        let Some(handle) = self.held[control.index()] else {
            return false;
        };
        match control {
            Control::MoveLeft | Control::MoveRight => self.horizontal.is_live(handle),
            Control::SoftDrop => self.soft_drop.is_live(handle),
            _ => false,
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        match (self.horizontal.due_at(), self.soft_drop.due_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Repeat commands due at `now_ms`.
    pub fn fire_due(&mut self, now_ms: u64) -> ArrayVec<EngineCommand, 2> {
        let mut commands = ArrayVec::new();
        if let Some(control) = self.horizontal.fire(now_ms) {
            commands.push(control.command());
        }
        if let Some(control) = self.soft_drop.fire(now_ms) {
            commands.push(control.command());
        }
        commands
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    const LEFT: EngineCommand = EngineCommand::Move(Direction::Left);
    const RIGHT: EngineCommand = EngineCommand::Move(Direction::Right);

    #[test]
    fn test_press_issues_immediately_then_repeats() {
        let mut ic = InputController::new();
        assert_eq!(ic.on_press_start(Control::MoveLeft, 0), LEFT);

        assert!(ic.fire_due(99).is_empty());
        assert_eq!(ic.fire_due(100).as_slice(), &[LEFT]);
        assert_eq!(ic.fire_due(200).as_slice(), &[LEFT]);
    }

    #[test]
    fn test_release_stops_repeat_without_command() {
        let mut ic = InputController::new();
        ic.on_press_start(Control::SoftDrop, 0);
        assert_eq!(ic.fire_due(100).as_slice(), &[EngineCommand::SoftDrop]);

        ic.on_press_end(Control::SoftDrop);
        assert!(!ic.is_repeating(Control::SoftDrop));
        assert!(ic.fire_due(1_000).is_empty());
        assert_eq!(ic.next_due(), None);
    }

    #[test]
    fn test_repress_replaces_live_repeat() {
        let mut ic = InputController::new();
        ic.on_press_start(Control::MoveRight, 0);
        ic.on_press_start(Control::MoveRight, 50);

        // Only the second press' schedule is live.
        assert!(ic.fire_due(100).is_empty());
        assert_eq!(ic.fire_due(150).as_slice(), &[RIGHT]);
    }

    #[test]
    fn test_opposite_direction_supersedes_and_stale_release_is_ignored() {
        let mut ic = InputController::new();
        ic.on_press_start(Control::MoveLeft, 0);
        ic.on_press_start(Control::MoveRight, 30);
        assert!(!ic.is_repeating(Control::MoveLeft));
        assert!(ic.is_repeating(Control::MoveRight));

        // Releasing the superseded key must not stop the live repeat.
        ic.on_press_end(Control::MoveLeft);
        assert_eq!(ic.fire_due(130).as_slice(), &[RIGHT]);
    }

    #[test]
    fn test_soft_drop_and_horizontal_repeat_independently() {
        let mut ic = InputController::new();
        ic.on_press_start(Control::MoveLeft, 0);
        ic.on_press_start(Control::SoftDrop, 0);
        assert_eq!(
            ic.fire_due(100).as_slice(),
            &[LEFT, EngineCommand::SoftDrop]
        );
    }

    #[test]
    fn test_single_shot_controls_do_not_repeat() {
        let mut ic = InputController::new();
        assert_eq!(ic.on_press_start(Control::HardDrop, 0), EngineCommand::HardDrop);
        assert_eq!(ic.on_press_start(Control::RotateCcw, 0), EngineCommand::RotateCcw);
        assert_eq!(ic.next_due(), None);
        ic.on_press_end(Control::HardDrop);
    }

    #[test]
    fn test_release_all_clears_every_repeat() {
        let mut ic = InputController::with_interval(50);
        ic.on_press_start(Control::MoveLeft, 0);
        ic.on_press_start(Control::SoftDrop, 0);
        ic.release_all();
        assert_eq!(ic.next_due(), None);
        assert!(ic.fire_due(500).is_empty());
    }

    #[test]
    fn test_every_control_has_a_held_slot() {
        let mut ic = InputController::new();
        for control in Control::ALL {
            assert_eq!(ic.on_press_start(control, 0), control.command());
            assert_eq!(ic.is_repeating(control), control.is_repeating());
            ic.on_press_end(control);
            assert!(!ic.is_repeating(control));
        }
    }
}
