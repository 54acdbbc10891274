//! Session configuration.
//!
//! Defaults come from the shared timing constants. A JSON document may override
//! any subset of fields, and `BLOCKFALL_*` environment variables override on top.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cadence::Cadence;
use crate::types::{
    BASE_CADENCE_MS, CADENCE_STEP_MS, HARD_DROP_PULSE_MS, LEVEL_UP_PULSE_MS, LINES_PER_LEVEL,
    MIN_CADENCE_MS, REPEAT_INTERVAL_MS, UI_POLL_INTERVAL_MS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },
    #[error("min_cadence_ms ({floor}) exceeds base_cadence_ms ({base})")]
    FloorAboveBase { floor: u64, base: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub poll_interval_ms: u64,
    pub repeat_interval_ms: u64,
    pub base_cadence_ms: u64,
    pub cadence_step_ms: u64,
    pub min_cadence_ms: u64,
    pub lines_per_level: u32,
    pub level_up_pulse_ms: u32,
    pub hard_drop_pulse_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: UI_POLL_INTERVAL_MS,
            repeat_interval_ms: REPEAT_INTERVAL_MS,
            base_cadence_ms: BASE_CADENCE_MS,
            cadence_step_ms: CADENCE_STEP_MS,
            min_cadence_ms: MIN_CADENCE_MS,
            lines_per_level: LINES_PER_LEVEL,
            level_up_pulse_ms: LEVEL_UP_PULSE_MS,
            hard_drop_pulse_ms: HARD_DROP_PULSE_MS,
        }
    }
}

impl SessionConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(s)?;
        config.validate()
    }

    /// Apply `BLOCKFALL_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Values that fail to parse are ignored.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        if let Some(v) = read("BLOCKFALL_POLL_MS") {
            self.poll_interval_ms = v;
        }
        if let Some(v) = read("BLOCKFALL_REPEAT_MS") {
            self.repeat_interval_ms = v;
        }
        if let Some(v) = read("BLOCKFALL_BASE_CADENCE_MS") {
            self.base_cadence_ms = v;
        }
        if let Some(v) = read("BLOCKFALL_CADENCE_STEP_MS") {
            self.cadence_step_ms = v;
        }
        if let Some(v) = read("BLOCKFALL_MIN_CADENCE_MS") {
            self.min_cadence_ms = v;
        }
        if let Some(v) = read("BLOCKFALL_LINES_PER_LEVEL").and_then(|v| u32::try_from(v).ok()) {
            self.lines_per_level = v;
        }
        self
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        let nonzero = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("repeat_interval_ms", self.repeat_interval_ms),
            ("base_cadence_ms", self.base_cadence_ms),
            ("min_cadence_ms", self.min_cadence_ms),
            ("lines_per_level", u64::from(self.lines_per_level)),
        ];
        if let Some(&(field, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero { field });
        }
        if self.min_cadence_ms > self.base_cadence_ms {
            return Err(ConfigError::FloorAboveBase {
                floor: self.min_cadence_ms,
                base: self.base_cadence_ms,
            });
        }
        Ok(self)
    }

    pub fn cadence(&self) -> Cadence {
        Cadence::new(
            self.base_cadence_ms,
            self.cadence_step_ms,
            self.min_cadence_ms,
            self.lines_per_level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_matches_constants() {
        let c = SessionConfig::default();
        assert_eq!(c.poll_interval_ms, 100);
        assert_eq!(c.repeat_interval_ms, 100);
        assert_eq!(c.cadence(), Cadence::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = SessionConfig::from_json(r#"{"base_cadence_ms": 300}"#).unwrap();
        assert_eq!(c.base_cadence_ms, 300);
        assert_eq!(c.min_cadence_ms, 50);
        assert_eq!(c.lines_per_level, 10);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = SessionConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_zero_lines_per_level_is_rejected() {
        let err = SessionConfig::from_json(r#"{"lines_per_level": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Zero {
                field: "lines_per_level"
            }
        ));
    }

    #[test]
    fn test_floor_above_base_is_rejected() {
        let err = SessionConfig::from_json(r#"{"base_cadence_ms": 40}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::FloorAboveBase { floor: 50, base: 40 }
        ));
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let env: HashMap<&str, &str> = [
            ("BLOCKFALL_POLL_MS", "250"),
            ("BLOCKFALL_REPEAT_MS", "fast"),
            ("BLOCKFALL_LINES_PER_LEVEL", " 5 "),
        ]
        .into_iter()
        .collect();

        let c = SessionConfig::default()
            .with_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(c.poll_interval_ms, 250);
        assert_eq!(c.repeat_interval_ms, 100);
        assert_eq!(c.lines_per_level, 5);
    }
}
