//! Session core - timing, input repeat and feedback orchestration
//!
//! This crate decides *when* the simulation advances, *when* held inputs
//! repeat, how the difficulty level maps to drop cadence, and which feedback
//! side effects fire on which state transitions. The simulation itself is an
//! opaque engine behind [`SimulationEngine`].
//!
//! The core does no I/O and reads no clock:
//!
//! - **Deterministic**: time is a `u64` millisecond value supplied by the host
//! - **Single-threaded**: everything is serialized through `&mut Session`
//! - **Allocation-free hot path**: timers, loops and input repeat use fixed
//!   storage, so [`Session::pump`] never touches the heap
//!
//! # Module Structure
//!
//! - [`timer`]: cancellable repeating timer with generation handles
//! - [`cadence`]: level derivation and drop cadence
//! - [`input`]: press/hold/release to engine commands
//! - [`drop_scheduler`]: variable-cadence gravity loop
//! - [`poll`]: fixed-cadence engine sampling
//! - [`feedback`]: edge detection and best-effort cues, pulses and music
//! - [`session`]: lifecycle bridge owning all of the above
//! - [`engine`] / [`host`]: collaborator seams
//! - [`config`]: serde-backed session configuration
//!
//! # Example
//!
//! ```
//! use tui_blockfall_core::{
//!     EngineCommand, NullFeedback, NullPresentation, Session, SessionConfig, SimulationEngine,
//! };
//!
//! #[derive(Default)]
//! struct Counter {
//!     advances: u32,
//! }
//!
//! impl SimulationEngine for Counter {
//!     fn apply(&mut self, command: EngineCommand) {
//!         if command == EngineCommand::Advance {
//!             self.advances += 1;
//!         }
//!     }
//!     fn score(&self) -> u32 { 0 }
//!     fn lines(&self) -> u32 { 0 }
//!     fn is_game_over(&self) -> bool { false }
//! }
//!
//! let mut session = Session::new(SessionConfig::default(), NullPresentation, NullFeedback);
//! session.start(0, Counter::default());
//! session.run_until(300);
//!
//! // Immediate tick, then one per 150ms at level 1.
//! assert_eq!(session.engine().get().map(|e| e.advances), Some(3));
//! ```

pub mod cadence;
pub mod config;
pub mod drop_scheduler;
pub mod engine;
pub mod feedback;
pub mod host;
pub mod input;
pub mod poll;
pub mod session;
pub mod timer;

pub use tui_blockfall_types as types;

pub use cadence::{drop_cadence_ms, level_for_lines, Cadence};
pub use config::{ConfigError, SessionConfig};
pub use drop_scheduler::{DropScheduler, LoopState};
pub use engine::{EngineHandle, Readout, SimulationEngine};
pub use feedback::{FeedbackCoordinator, MusicState, Transitions};
pub use host::{FeedbackError, FeedbackSink, NullFeedback, NullPresentation, Presentation};
pub use input::InputController;
pub use poll::PollLoop;
pub use session::{Session, SessionFlags};
pub use timer::{RepeatHandle, RepeatTimer};
pub use types::{
    Control, Cue, Direction, EngineCommand, LockEvent, MusicCommand, Overlay, Snapshot,
    SurfaceEvent,
};
