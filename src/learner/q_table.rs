//! Sparse action-value table.

use std::collections::HashMap;

use crate::grid::{Action, Observation};

/// Sparse map from `(observation, action)` to an estimated value.
///
/// Entries that were never written read as `0.0` through [`QTable::get_or_zero`].
/// The table only grows: values are inserted or overwritten, never removed.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(Observation, Action), f64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `(observation, action)`, or `0.0` if absent.
    pub fn get_or_zero(&self, observation: Observation, action: Action) -> f64 {
        self.values
            .get(&(observation, action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, observation: Observation, action: Action, value: f64) {
        self.values.insert((observation, action), value);
    }

    /// Values of all four actions at `observation`, in [`Action::ALL`] order.
    pub fn action_values(&self, observation: Observation) -> [f64; Action::COUNT] {
        Action::ALL.map(|a| self.get_or_zero(observation, a))
    }

    /// Largest action value at `observation`.
    pub fn max_value(&self, observation: Observation) -> f64 {
        self.action_values(observation)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct observations with at least one stored entry.
    pub fn observation_count(&self) -> usize {
        let mut seen: Vec<Observation> = self.values.keys().map(|(o, _)| *o).collect();
        seen.sort();
        seen.dedup();
        seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entries_read_zero() {
        let table = QTable::new();
        let obs = Observation::new(3, -2);
        for action in Action::ALL {
            assert_eq!(table.get_or_zero(obs, action), 0.0);
        }
        assert_eq!(table.max_value(obs), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn max_value_with_negative_entries() {
        let mut table = QTable::new();
        let obs = Observation::new(1, 1);
        for action in Action::ALL {
            table.set(obs, action, -1.0 - action.index() as f64);
        }
        assert_eq!(table.max_value(obs), -1.0);
        // One missing entry is an implicit zero and wins.
        let other = Observation::new(0, 1);
        table.set(other, Action::Up, -5.0);
        assert_eq!(table.max_value(other), 0.0);
    }

    #[test]
    fn overwrite_does_not_grow() {
        let mut table = QTable::new();
        let obs = Observation::new(0, 0);
        table.set(obs, Action::Left, 1.0);
        table.set(obs, Action::Left, 2.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_or_zero(obs, Action::Left), 2.0);
        assert_eq!(table.observation_count(), 1);
    }
}
