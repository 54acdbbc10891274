//! Key mapping from terminal events to host inputs.

use crate::types::Control;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Input forwarded from the terminal to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    PressStart(Control),
    PressEnd(Control),
    TogglePause,
    Restart,
    Quit,
}

/// Map a key code to the game control it drives.
pub fn control_for_key(code: KeyCode) -> Option<Control> {
    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Control::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Control::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Control::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') | KeyCode::Char('x') => {
            Some(Control::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('y') => Some(Control::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(Control::HardDrop),
        KeyCode::Char('c') => Some(Control::Hold),

        _ => None,
    }
}

/// Translate one terminal key event.
///
/// Terminal auto-repeat (`KeyEventKind::Repeat`) is dropped; the session runs
/// its own repeat timers.
pub fn translate(key: KeyEvent) -> Option<HostInput> {
    match key.kind {
        KeyEventKind::Press => {
            if should_quit(key) {
                return Some(HostInput::Quit);
            }
            match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') => Some(HostInput::TogglePause),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(HostInput::Restart),
                code => control_for_key(code).map(HostInput::PressStart),
            }
        }
        KeyEventKind::Release => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return None;
            }
            control_for_key(key.code).map(HostInput::PressEnd)
        }
        KeyEventKind::Repeat => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
