//! Configuration types for a life automaton run.

use serde::{Deserialize, Serialize};

use super::{RuleError, RuleSet};
use crate::compute::buffer_len;

/// Shortest accepted step interval in milliseconds.
pub const MIN_INTERVAL_MS: u64 = 25;
/// Longest accepted step interval in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 1000;

fn default_interval() -> u64 {
    100
}

/// Cell color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Top-level automaton configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonConfig {
    /// Grid height in cells.
    pub height: usize,
    /// Grid width in cells.
    pub width: usize,
    /// Birth/survival rule, neighborhood and topology.
    #[serde(default)]
    pub rules: RuleSet,
    /// Delay between generations when driven by a timer.
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    /// Display color of live cells, carried through to saved games.
    #[serde(default)]
    pub color: Rgb,
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            height: 50,
            width: 50,
            rules: RuleSet::default(),
            interval_ms: default_interval(),
            color: Rgb::BLACK,
        }
    }
}

impl AutomatonConfig {
    /// Number of addressable cells.
    #[inline]
    pub fn area(&self) -> usize {
        self.height.saturating_mul(self.width)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if buffer_len(self.height, self.width).is_none() {
            return Err(ConfigError::InvalidDimensions);
        }
        if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&self.interval_ms) {
            return Err(ConfigError::InvalidInterval(self.interval_ms));
        }
        self.rules.validate()?;
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (height, width) must be non-zero and fit in memory")]
    InvalidDimensions,
    #[error("Step interval {0} ms is outside {min}..={max} ms", min = MIN_INTERVAL_MS, max = MAX_INTERVAL_MS)]
    InvalidInterval(u64),
    #[error("Invalid rule set: {0}")]
    Rule(#[from] RuleError),
}
