//! tui-blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts the async
//! terminal driver ([`host`]) used by the `tui-blockfall` binary.

pub use tui_blockfall_core as core;
pub use tui_blockfall_engine as engine;
pub use tui_blockfall_input as input;
pub use tui_blockfall_term as term;
pub use tui_blockfall_types as types;

pub mod host;
