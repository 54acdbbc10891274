//! Held-key tracking for terminals.
//!
//! Terminals without the keyboard enhancement protocol report a held key as a
//! stream of presses and never report the release. The tracker collapses that
//! stream into one `PressStart` and, when configured with a timeout,
//! synthesizes the `PressEnd` once presses stop arriving.

use arrayvec::ArrayVec;

use crate::map::HostInput;
use crate::types::Control;

// In terminals without key-release events, a short timeout keeps a single tap
// from turning into a sustained hold.
pub const KEY_RELEASE_TIMEOUT_MS: u64 = 150;

const HELD_CONTROLS: [Control; 3] = [Control::MoveLeft, Control::MoveRight, Control::SoftDrop];
const SLOTS: usize = HELD_CONTROLS.len();

#[derive(Debug, Clone)]
pub struct KeyTracker {
    /// Last press seen per held control, in `HELD_CONTROLS` order
    last_seen: [Option<u64>; SLOTS],
    release_timeout_ms: Option<u64>,
}

impl KeyTracker {
    /// Tracker for terminals that report releases: nothing is synthesized.
    pub fn with_release_events() -> Self {
        Self {
            last_seen: [None; SLOTS],
            release_timeout_ms: None,
        }
    }

    /// Tracker that synthesizes a release `timeout_ms` after the last press.
    pub fn synthesizing(timeout_ms: u64) -> Self {
        Self {
            last_seen: [None; SLOTS],
            release_timeout_ms: Some(timeout_ms.max(1)),
        }
    }

    fn slot(control: Control) -> Option<usize> {
        HELD_CONTROLS.iter().position(|held| *held == control)
    }

    pub fn is_held(&self, control: Control) -> bool {
        Self::slot(control).is_some_and(|i| self.last_seen[i].is_some())
    }

    /// Filter one translated input. Returns what the session should see.
    pub fn on_input(&mut self, input: HostInput, now_ms: u64) -> Option<HostInput> {
        match input {
            HostInput::PressStart(control) => {
                let Some(i) = Self::slot(control) else {
                    return Some(input);
                };
                let was_held = self.last_seen[i].replace(now_ms).is_some();
                if let Some(other) = control.conflicting().and_then(Self::slot) {
                    self.last_seen[other] = None;
                }
                if was_held {
                    None
                } else {
                    Some(input)
                }
            }
            HostInput::PressEnd(control) => {
                if let Some(i) = Self::slot(control) {
                    self.last_seen[i] = None;
                }
                Some(input)
            }
            _ => Some(input),
        }
    }

    /// Synthesized releases for holds whose presses stopped arriving.
    pub fn expire(&mut self, now_ms: u64) -> ArrayVec<HostInput, SLOTS> {
        let mut released = ArrayVec::new();
        let Some(timeout) = self.release_timeout_ms else {
            return released;
        };
        for (i, control) in HELD_CONTROLS.into_iter().enumerate() {
            if let Some(seen) = self.last_seen[i] {
                if now_ms.saturating_sub(seen) >= timeout {
                    self.last_seen[i] = None;
                    released.push(HostInput::PressEnd(control));
                }
            }
        }
        released
    }

    /// When the next synthesized release is due.
    pub fn next_expiry(&self) -> Option<u64> {
        let timeout = self.release_timeout_ms?;
        self.last_seen.iter().flatten().map(|seen| seen + timeout).min()
    }

    /// Release every held control (focus loss).
    pub fn release_all(&mut self) -> ArrayVec<HostInput, SLOTS> {
        let mut released = ArrayVec::new();
        for (i, control) in HELD_CONTROLS.into_iter().enumerate() {
            if self.last_seen[i].take().is_some() {
                released.push(HostInput::PressEnd(control));
            }
        }
        released
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::synthesizing(KEY_RELEASE_TIMEOUT_MS)
    }
}
