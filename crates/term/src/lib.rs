//! Terminal host layer.
//!
//! The session sees this crate only through its collaborator traits:
//! [`TermPresentation`] and [`TermFeedback`] write into a shared [`Hud`],
//! [`HudView`] lays the HUD out into a [`FrameBuffer`] (pure, unit-tested),
//! and [`TerminalRenderer`] flushes frames to the terminal with diffing.

pub mod fb;
pub mod hud;
pub mod presentation;
pub mod renderer;

pub use tui_blockfall_core as core;
pub use tui_blockfall_types as types;

pub use fb::{Cell, FrameBuffer, Tone};
pub use hud::{Hud, HudView};
pub use presentation::{shared_hud, SharedHud, TermFeedback, TermPresentation};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
