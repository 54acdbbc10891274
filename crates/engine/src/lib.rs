//! Stand-in simulation engines.
//!
//! The real block-placement simulation is external to this workspace. These
//! engines implement [`SimulationEngine`](tui_blockfall_core::SimulationEngine)
//! so the session can be driven end to end:
//!
//! - [`RecordingEngine`]: logs every command and serves scripted counters (tests)
//! - [`DemoEngine`]: tiny deterministic toy that stacks, clears and tops out (terminal host)

pub mod demo;
pub mod recording;

pub use tui_blockfall_core as core;
pub use tui_blockfall_types as types;

pub use demo::DemoEngine;
pub use recording::{EngineProbe, RecordingEngine};
