//! Shared types module - data structures and constants
//!
//! This module defines the fundamental types exchanged between the session core,
//! the simulation engine and the host (terminal, presentation, audio). All types
//! are plain data with no external dependencies.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `UI_POLL_INTERVAL_MS` | 100 | UI poll loop cadence |
//! | `REPEAT_INTERVAL_MS` | 100 | Move / soft-drop hold repeat |
//! | `BASE_CADENCE_MS` | 150 | Drop cadence at level 1 |
//! | `CADENCE_STEP_MS` | 10 | Cadence decrement per level |
//! | `MIN_CADENCE_MS` | 50 | Cadence floor |
//! | `LEVEL_UP_PULSE_MS` | 100 | Tactile pulse on level change |
//! | `HARD_DROP_PULSE_MS` | 50 | Tactile pulse on hard drop |
//!
//! # Drop Cadence by Level
//!
//! `max(MIN_CADENCE_MS, BASE_CADENCE_MS - (level - 1) * CADENCE_STEP_MS)`:
//!
//! | Level | Cadence |
//! |-------|---------|
//! | 1 | 150ms |
//! | 2 | 140ms |
//! | 5 | 110ms |
//! | 10 | 60ms |
//! | 11+ | 50ms |
//!
//! # Examples
//!
//! ```
//! use tui_blockfall_types::{Control, Direction, EngineCommand, BASE_CADENCE_MS};
//!
//! assert_eq!(Control::MoveLeft.command(), EngineCommand::Move(Direction::Left));
//! assert!(Control::SoftDrop.is_repeating());
//! assert!(!Control::HardDrop.is_repeating());
//!
//! assert_eq!(Control::from_str("rotateCcw"), Some(Control::RotateCcw));
//! assert_eq!(BASE_CADENCE_MS, 150);
//! ```

/// UI poll loop cadence (100ms)
pub const UI_POLL_INTERVAL_MS: u64 = 100;

/// Hold-to-repeat interval for movement and soft drop (100ms)
pub const REPEAT_INTERVAL_MS: u64 = 100;

/// Drop cadence at level 1 (150ms)
pub const BASE_CADENCE_MS: u64 = 150;

/// Drop cadence decrement per level (10ms)
pub const CADENCE_STEP_MS: u64 = 10;

/// Drop cadence floor (50ms)
pub const MIN_CADENCE_MS: u64 = 50;

/// Cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Tactile pulse length on a level change
pub const LEVEL_UP_PULSE_MS: u32 = 100;

/// Tactile pulse length on a hard drop
pub const HARD_DROP_PULSE_MS: u32 = 50;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_constants() {
        assert_eq!(UI_POLL_INTERVAL_MS, 100);
        assert_eq!(REPEAT_INTERVAL_MS, 100);
        assert_eq!(BASE_CADENCE_MS, 150);
        assert_eq!(CADENCE_STEP_MS, 10);
        assert_eq!(MIN_CADENCE_MS, 50);
        assert_eq!(LINES_PER_LEVEL, 10);
    }

    #[test]
    fn control_round_trips_through_str() {
        for control in Control::ALL {
            assert_eq!(Control::from_str(control.as_str()), Some(control));
        }
        assert_eq!(Control::from_str("MOVELEFT"), Some(Control::MoveLeft));
        assert_eq!(Control::from_str("jump"), None);
    }

    #[test]
    fn control_indices_are_dense() {
        for (i, control) in Control::ALL.iter().enumerate() {
            assert_eq!(control.index(), i);
        }
    }

    #[test]
    fn horizontal_controls_conflict_with_each_other_only() {
        assert_eq!(Control::MoveLeft.conflicting(), Some(Control::MoveRight));
        assert_eq!(Control::MoveRight.conflicting(), Some(Control::MoveLeft));
        assert_eq!(Control::SoftDrop.conflicting(), None);
        assert_eq!(Control::Hold.conflicting(), None);
    }

    #[test]
    fn direction_delta_matches_engine_convention() {
        assert_eq!(Direction::Left.delta(), -1);
        assert_eq!(Direction::Right.delta(), 1);
    }

    #[test]
    fn only_gravity_commands_may_lock() {
        assert!(EngineCommand::Advance.may_lock());
        assert!(EngineCommand::SoftDrop.may_lock());
        assert!(EngineCommand::HardDrop.may_lock());
        assert!(!EngineCommand::Move(Direction::Left).may_lock());
        assert!(!EngineCommand::Hold.may_lock());
    }
}

/// Horizontal direction for a move command
///
/// The engine convention is `-1` for left and `+1` for right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Physical game controls
///
/// - **MoveLeft / MoveRight / SoftDrop**: hold to repeat
/// - **RotateCw / RotateCcw / HardDrop / Hold**: single-shot per activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
    HardDrop,
    Hold,
}

impl Control {
    /// Every control, in index order
    pub const ALL: [Control; 7] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::SoftDrop,
        Control::RotateCw,
        Control::RotateCcw,
        Control::HardDrop,
        Control::Hold,
    ];

    /// Dense index into per-control tables
    pub fn index(&self) -> usize {
        match self {
            Control::MoveLeft => 0,
            Control::MoveRight => 1,
            Control::SoftDrop => 2,
            Control::RotateCw => 3,
            Control::RotateCcw => 4,
            Control::HardDrop => 5,
            Control::Hold => 6,
        }
    }

    /// Whether holding the control repeats its command
    pub fn is_repeating(&self) -> bool {
        matches!(
            self,
            Control::MoveLeft | Control::MoveRight | Control::SoftDrop
        )
    }

    /// The control sharing this control's repeat slot, if any
    ///
    /// Left and right share one horizontal slot: pressing one supersedes the other.
    pub fn conflicting(&self) -> Option<Control> {
        match self {
            Control::MoveLeft => Some(Control::MoveRight),
            Control::MoveRight => Some(Control::MoveLeft),
            _ => None,
        }
    }

    /// Engine command issued by one activation of this control
    pub fn command(&self) -> EngineCommand {
        match self {
            Control::MoveLeft => EngineCommand::Move(Direction::Left),
            Control::MoveRight => EngineCommand::Move(Direction::Right),
            Control::SoftDrop => EngineCommand::SoftDrop,
            Control::RotateCw => EngineCommand::RotateCw,
            Control::RotateCcw => EngineCommand::RotateCcw,
            Control::HardDrop => EngineCommand::HardDrop,
            Control::Hold => EngineCommand::Hold,
        }
    }

    /// Parse control from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Control::MoveLeft),
            "moveright" => Some(Control::MoveRight),
            "softdrop" => Some(Control::SoftDrop),
            "rotatecw" => Some(Control::RotateCw),
            "rotateccw" => Some(Control::RotateCcw),
            "harddrop" => Some(Control::HardDrop),
            "hold" => Some(Control::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::MoveLeft => "moveLeft",
            Control::MoveRight => "moveRight",
            Control::SoftDrop => "softDrop",
            Control::RotateCw => "rotateCw",
            Control::RotateCcw => "rotateCcw",
            Control::HardDrop => "hardDrop",
            Control::Hold => "hold",
        }
    }
}

/// Commands accepted by the simulation engine
///
/// Commands are fire-and-forget; results are observed through queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCommand {
    /// Create fresh engine state (issued once when the handle is created)
    Initialize,
    /// Advance the simulation by one gravity step
    Advance,
    /// Shift the active piece one column
    Move(Direction),
    RotateCw,
    RotateCcw,
    /// Move the active piece one row down
    SoftDrop,
    /// Drop the active piece to the floor and lock it
    HardDrop,
    Hold,
    /// Reset engine state for a new session (restart)
    Reset,
    /// Release engine resources (issued exactly once)
    Teardown,
}

impl EngineCommand {
    /// Whether the command can lock a piece (and so produce a lock event)
    pub fn may_lock(&self) -> bool {
        matches!(
            self,
            EngineCommand::Advance | EngineCommand::SoftDrop | EngineCommand::HardDrop
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineCommand::Initialize => "initialize",
            EngineCommand::Advance => "advance",
            EngineCommand::Move(Direction::Left) => "moveLeft",
            EngineCommand::Move(Direction::Right) => "moveRight",
            EngineCommand::RotateCw => "rotateCw",
            EngineCommand::RotateCcw => "rotateCcw",
            EngineCommand::SoftDrop => "softDrop",
            EngineCommand::HardDrop => "hardDrop",
            EngineCommand::Hold => "hold",
            EngineCommand::Reset => "reset",
            EngineCommand::Teardown => "teardown",
        }
    }
}

/// Render-side surface lifecycle, forwarded to the engine by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Created,
    Resized { width: u16, height: u16 },
    FrameRender,
}

/// Engine-side event emitted after a piece locks.
///
/// Drained by the session after gravity commands to request lock / line-clear cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
}

/// Named feedback cues (best-effort playback)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Lock,
    LineClear,
    Rotate,
    Hold,
    Restart,
    GameOver,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Lock => "lock",
            Cue::LineClear => "clear",
            Cue::Rotate => "rotate",
            Cue::Hold => "hold",
            Cue::Restart => "restart",
            Cue::GameOver => "gameover",
        }
    }
}

/// Ambient music transport commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCommand {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Host overlays toggled by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Paused,
    GameOver,
}

/// Observable values republished by the UI poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_over: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            game_over: false,
        }
    }
}
