//! Per-agent, per-episode metrics records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an agent's episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeStatus {
    ReachedGoal,
    TimedOut,
}

impl EpisodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeStatus::ReachedGoal => "ReachedGoal",
            EpisodeStatus::TimedOut => "TimedOut",
        }
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one agent in one episode. Written once, never revised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// 1-based episode index.
    pub episode: usize,
    pub agent: usize,
    /// Sum of step rewards collected during the episode.
    pub total_reward: f64,
    pub status: EpisodeStatus,
    /// Exploration rate in effect at episode end.
    pub exploration_rate: f64,
}

/// Aggregate of one episode across all agents, passed to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    /// Ticks actually run; below the budget when every agent finished early.
    pub ticks: usize,
    pub exploration_rate: f64,
    pub records: Vec<EpisodeRecord>,
}

impl EpisodeSummary {
    /// Mean total reward over agents.
    pub fn mean_reward(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.records.iter().map(|r| r.total_reward).sum::<f64>() / self.records.len() as f64
    }

    /// Number of agents that reached the goal.
    pub fn goal_reaches(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == EpisodeStatus::ReachedGoal)
            .count()
    }
}
