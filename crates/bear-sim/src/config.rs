//! Simulation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Fixed parameters for a simulation run, supplied at process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Trees placed in every scenario.
    pub obstacle_count: usize,
    /// Pause after each whole-scene change, in milliseconds.
    pub dwell_ms: u64,
    /// Pause after each bear step, in milliseconds.
    pub step_ms: u64,
    /// Rejection-sampling cap for a single placement.
    pub max_placement_attempts: usize,
    /// Seed for reproducible scenarios. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 15,
            obstacle_count: 170,
            dwell_ms: 2000,
            step_ms: 500,
            max_placement_attempts: 10_000,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Dwell interval as a [`Duration`].
    #[inline]
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    /// Step interval as a [`Duration`].
    #[inline]
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }

    /// Number of cells in the grid.
    #[inline]
    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Reject configurations the scenario builder could never satisfy.
    pub fn validate(&self) -> SimResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SimError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        // One bear and one honey share the grid with the trees.
        if self.obstacle_count + 2 > self.area() {
            return Err(SimError::Config(format!(
                "{} obstacles plus bear and honey do not fit in a {}x{} grid",
                self.obstacle_count, self.width, self.height
            )));
        }
        if self.max_placement_attempts == 0 {
            return Err(SimError::Config(
                "max_placement_attempts must be positive".into(),
            ));
        }
        Ok(())
    }
}
