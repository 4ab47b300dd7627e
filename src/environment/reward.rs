//! Reward function of the grid environment.

use crate::config::RewardConfig;
use crate::grid::Cell;

/// Computes rewards for the grid environment.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward for a move rejected by a wall, an obstacle or another agent.
    pub fn collision(rewards: &RewardConfig) -> f64 {
        rewards.collision
    }

    /// Reward for a successful move from `from` to `to`.
    ///
    /// # Components
    ///
    /// 1. **Step cost**: `step_cost` on every move.
    /// 2. **Distance shaping**: `+w × (d_old - d_new)` with Manhattan distances to the goal,
    ///    positive when the move gets closer.
    /// 3. **Goal bonus**: stepping onto the goal replaces the whole reward with `goal_reach`.
    pub fn movement(rewards: &RewardConfig, from: Cell, to: Cell, goal: Cell) -> f64 {
        if to == goal {
            return rewards.goal_reach;
        }
        let progress = from.manhattan(&goal) as f64 - to.manhattan(&goal) as f64;
        rewards.step_cost + rewards.shaping_weight * progress
    }
}
