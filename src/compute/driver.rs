//! Run-loop driver: owns the running/paused state and the step interval.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, MAX_INTERVAL_MS, MIN_INTERVAL_MS};

use super::{GenerationEngine, StepOutcome};

/// Whether the driver is currently ticking the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Periodic driver around a [`GenerationEngine`].
///
/// Ticks only step the engine while running. A stalled step moves the
/// driver back to idle.
#[derive(Debug, Clone)]
pub struct Driver {
    engine: GenerationEngine,
    interval: Duration,
    state: RunState,
}

impl Driver {
    pub fn new(engine: GenerationEngine, interval_ms: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            engine,
            interval: checked_interval(interval_ms)?,
            state: RunState::Idle,
        })
    }

    #[inline]
    pub fn engine(&self) -> &GenerationEngine {
        &self.engine
    }

    /// Mutable engine access. Editing is only meaningful between ticks.
    #[inline]
    pub fn engine_mut(&mut self) -> &mut GenerationEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> GenerationEngine {
        self.engine
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval_ms: u64) -> Result<(), ConfigError> {
        self.interval = checked_interval(interval_ms)?;
        Ok(())
    }

    pub fn start(&mut self) {
        if self.state == RunState::Idle {
            log::info!("Game started.");
        }
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            log::info!("Game paused.");
        }
        self.state = RunState::Idle;
    }

    /// Flip between running and idle, returning the new state.
    pub fn toggle(&mut self) -> RunState {
        match self.state {
            RunState::Idle => self.start(),
            RunState::Running => self.stop(),
        }
        self.state
    }

    /// One timer tick. Returns `None` while idle.
    pub fn tick(&mut self) -> Option<StepOutcome> {
        if !self.is_running() {
            return None;
        }
        let outcome = self.engine.step();
        if outcome.is_stalled() {
            self.state = RunState::Idle;
        }
        Some(outcome)
    }

    /// Start and tick up to `max_ticks` times, sleeping the interval between
    /// ticks. Returns the outcomes in order; the last one is a stall if the
    /// run ended early.
    pub fn run_for(&mut self, max_ticks: u64) -> Vec<StepOutcome> {
        self.start();
        let mut outcomes = Vec::new();
        for i in 0..max_ticks {
            if i > 0 {
                thread::sleep(self.interval);
            }
            match self.tick() {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }
        self.stop();
        outcomes
    }
}

fn checked_interval(interval_ms: u64) -> Result<Duration, ConfigError> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&interval_ms) {
        return Err(ConfigError::InvalidInterval(interval_ms));
    }
    Ok(Duration::from_millis(interval_ms))
}
