//! Configuration for the grid environment and the training run.
//!
//! A [`SimConfig`] is built once at startup, validated, and then handed to the
//! [`Environment`](crate::environment::Environment), each
//! [`QAgent`](crate::learner::QAgent) and the [`Trainer`](crate::training::Trainer).
//! Nothing reads configuration from global state.

mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};

/// Q-learning constants shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Learning rate α, in (0, 1].
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1].
    pub discount_factor: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
        }
    }
}

/// Epsilon-greedy exploration schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Exploration rate before the first decay.
    pub start: f64,
    /// Multiplicative decay applied once per episode.
    pub decay: f64,
    /// Floor the rate never drops below.
    pub min: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            start: 1.0,
            decay: 0.995,
            min: 0.05,
        }
    }
}

/// Grid geometry and population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid.
    pub size: usize,
    /// Number of learning agents.
    pub agents: usize,
    /// Number of static obstacles placed per episode.
    pub obstacles: usize,
    /// Maximum random draws when placing a single entity.
    pub max_placement_attempts: usize,
}

impl GridConfig {
    /// Total number of cells on the grid.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Tick budget for one episode; larger grids get proportionally more time.
    pub fn step_budget(&self) -> usize {
        4 * self.size
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 100,
            agents: 50,
            obstacles: 50,
            max_placement_attempts: 10_000,
        }
    }
}

/// Reward structure of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward for stepping onto the goal; replaces the step reward.
    pub goal_reach: f64,
    /// Reward for bumping into a wall, an obstacle or another agent.
    pub collision: f64,
    /// Base reward for every successful move.
    pub step_cost: f64,
    /// Weight of the distance-to-goal shaping term.
    pub shaping_weight: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal_reach: 300.0,
            collision: -10.0,
            step_cost: -0.15,
            shaping_weight: 0.05,
        }
    }
}

/// Complete, immutable description of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    // --- Learning ---
    pub learning: LearningConfig,
    pub exploration: ExplorationConfig,

    // --- Environment ---
    pub grid: GridConfig,
    pub rewards: RewardConfig,

    // --- Run ---
    /// Number of episodes to train for.
    pub episodes: usize,
    /// Seed for every random source of the run.
    pub seed: u64,
    /// Emit a progress log line every this many episodes (0 disables it).
    pub progress_interval: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            learning: LearningConfig::default(),
            exploration: ExplorationConfig::default(),
            grid: GridConfig::default(),
            rewards: RewardConfig::default(),
            episodes: 300,
            seed: 42,
            progress_interval: 10,
        }
    }
}

impl SimConfig {
    /// Checks every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.learning.learning_rate;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::LearningRate(alpha));
        }
        let gamma = self.learning.discount_factor;
        if !(0.0..=1.0).contains(&gamma) {
            return Err(ConfigError::DiscountFactor(gamma));
        }
        if self.episodes == 0 {
            return Err(ConfigError::NoEpisodes);
        }

        let ExplorationConfig { start, decay, min } = self.exploration;
        if !(0.0 <= min && min <= start && start <= 1.0) {
            return Err(ConfigError::ExplorationBounds { start, min });
        }
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(ConfigError::ExplorationDecay(decay));
        }

        let grid = &self.grid;
        if grid.size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if grid.agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        let cells = grid.cell_count();
        // The goal takes one cell on top of the obstacles.
        if grid.obstacles >= cells {
            return Err(ConfigError::TooManyObstacles {
                obstacles: grid.obstacles,
                cells,
            });
        }
        let free = cells - grid.obstacles - 1;
        if grid.agents > free {
            return Err(ConfigError::TooManyAgents {
                agents: grid.agents,
                free,
            });
        }
        if grid.max_placement_attempts == 0 {
            return Err(ConfigError::NoPlacementAttempts);
        }

        let rewards = [
            ("goal_reach", self.rewards.goal_reach),
            ("collision", self.rewards.collision),
            ("step_cost", self.rewards.step_cost),
            ("shaping_weight", self.rewards.shaping_weight),
        ];
        for (name, value) in rewards {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteReward(name));
            }
        }

        Ok(())
    }
}
