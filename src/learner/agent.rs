//! Independent tabular Q-learning agent.

use rand::seq::SliceRandom;
use rand::Rng;

use super::q_table::QTable;
use crate::config::LearningConfig;
use crate::grid::{Action, Observation};

/// A single learner with its own private [`QTable`].
///
/// Agents never share tables; the only thing they have in common is the
/// [`LearningConfig`] constants.
#[derive(Debug, Clone)]
pub struct QAgent {
    /// Agent index within the environment.
    pub id: usize,
    table: QTable,
    params: LearningConfig,
}

impl QAgent {
    pub fn new(id: usize, params: LearningConfig) -> Self {
        Self {
            id,
            table: QTable::new(),
            params,
        }
    }

    /// Epsilon-greedy action selection.
    ///
    /// With probability `exploration_rate` the action is uniform over all four;
    /// otherwise it maximises the table value at `observation`, breaking ties
    /// uniformly among every maximiser.
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        observation: Observation,
        exploration_rate: f64,
        rng: &mut R,
    ) -> Action {
        if rng.gen::<f64>() < exploration_rate {
            return Action::ALL[rng.gen_range(0..Action::COUNT)];
        }
        self.greedy_action(observation, rng)
    }

    /// Greedy action with uniform random tie-breaking.
    pub fn greedy_action<R: Rng + ?Sized>(&self, observation: Observation, rng: &mut R) -> Action {
        let values = self.table.action_values(observation);
        let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let candidates: Vec<Action> = Action::ALL
            .into_iter()
            .zip(values)
            .filter(|(_, v)| *v == best)
            .map(|(a, _)| a)
            .collect();
        // `values` has no NaN, so at least one action equals the max.
        *candidates.choose(rng).unwrap_or(&Action::ALL[0])
    }

    /// Bellman backup:
    /// `Q(s, a) += α × (r + γ × max_a' Q(s', a') - Q(s, a))`.
    ///
    /// Always bootstraps from `next_observation`, also after the goal was
    /// reached. Returns the new value.
    pub fn update(
        &mut self,
        observation: Observation,
        action: Action,
        reward: f64,
        next_observation: Observation,
    ) -> f64 {
        let current = self.table.get_or_zero(observation, action);
        let future = self.table.max_value(next_observation);
        let LearningConfig {
            learning_rate,
            discount_factor,
        } = self.params;
        let value = current + learning_rate * (reward + discount_factor * future - current);
        self.table.set(observation, action, value);
        value
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Mutable access to the table, e.g. to seed known values.
    pub fn table_mut(&mut self) -> &mut QTable {
        &mut self.table
    }
}
