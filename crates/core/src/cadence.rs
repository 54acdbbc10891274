//! Difficulty curve - level derivation and drop cadence.
//!
//! Both are pure functions of counters observed from the engine; nothing here
//! keeps state between calls.

use crate::types::{BASE_CADENCE_MS, CADENCE_STEP_MS, LINES_PER_LEVEL, MIN_CADENCE_MS};

/// Level and drop-cadence parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub base_ms: u64,
    pub step_ms: u64,
    pub floor_ms: u64,
    pub lines_per_level: u32,
}

impl Cadence {
    pub const fn new(base_ms: u64, step_ms: u64, floor_ms: u64, lines_per_level: u32) -> Self {
        Self {
            base_ms,
            step_ms,
            floor_ms,
            lines_per_level,
        }
    }

    /// `floor(lines / lines_per_level) + 1`
    pub fn level_for_lines(&self, lines: u32) -> u32 {
        lines / self.lines_per_level.max(1) + 1
    }

    /// `max(floor, base - (level - 1) * step)`
    ///
    /// Levels below 1 are treated as level 1. Never shorter than 1 ms.
    pub fn interval_ms(&self, level: u32) -> u64 {
        let steps = u64::from(level.saturating_sub(1));
        self.base_ms
            .saturating_sub(steps.saturating_mul(self.step_ms))
            .max(self.floor_ms)
            .max(1)
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(BASE_CADENCE_MS, CADENCE_STEP_MS, MIN_CADENCE_MS, LINES_PER_LEVEL)
    }
}

/// Level for a cleared-line count with the default curve
pub fn level_for_lines(lines: u32) -> u32 {
    Cadence::default().level_for_lines(lines)
}

/// Drop cadence for a level with the default curve
pub fn drop_cadence_ms(level: u32) -> u64 {
    Cadence::default().interval_ms(level)
}
