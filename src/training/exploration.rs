//! Episode-level exploration rate decay.

use crate::config::ExplorationConfig;

/// Shared epsilon-greedy exploration rate, decayed once per episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationSchedule {
    rate: f64,
    decay: f64,
    min: f64,
}

impl ExplorationSchedule {
    pub fn new(config: &ExplorationConfig) -> Self {
        Self {
            rate: config.start,
            decay: config.decay,
            min: config.min,
        }
    }

    /// Applies one decay step, `rate = max(min, rate × decay)`, and returns
    /// the new rate.
    pub fn decay(&mut self) -> f64 {
        self.rate = (self.rate * self.decay).max(self.min);
        self.rate
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}
