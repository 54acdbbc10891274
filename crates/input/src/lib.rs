//! Terminal input module (session-facing).
//!
//! Maps `crossterm` key events into press/release [`HostInput`]s for the
//! session and tracks held keys. Terminals that never report key releases get
//! synthesized releases from [`KeyTracker`] after a short timeout.

pub mod map;
pub mod tracker;

pub use tui_blockfall_types as types;

pub use map::{control_for_key, should_quit, translate, HostInput};
pub use tracker::{KeyTracker, KEY_RELEASE_TIMEOUT_MS};
