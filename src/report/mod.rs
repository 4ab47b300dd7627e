//! Offline analytics over persisted episode records.
//!
//! Aggregates per-episode mean reward, exploration rate and goal-reach
//! success rate, with rolling averages to smooth the learning curves.
//! Nothing here feeds back into training.

mod error;
mod log;

use std::collections::BTreeMap;
use std::fmt;

pub use error::ReportError;
pub use log::{read_log, read_log_file};

use crate::training::{EpisodeRecord, EpisodeStatus};

/// Default rolling-average window, in episodes.
pub const DEFAULT_WINDOW: usize = 10;

/// Aggregate of all agents in one episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStats {
    pub episode: usize,
    pub agents: usize,
    pub mean_reward: f64,
    pub exploration_rate: f64,
    /// Fraction of agents that reached the goal, in [0, 1].
    pub success_rate: f64,
}

/// Learning curves of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub window: usize,
    /// One entry per episode, in episode order.
    pub episodes: Vec<EpisodeStats>,
    /// Rolling mean of `mean_reward`.
    pub smoothed_reward: Vec<f64>,
    /// Rolling mean of `success_rate`.
    pub smoothed_success: Vec<f64>,
}

impl TrainingReport {
    /// Groups `records` by episode and computes the learning curves.
    ///
    /// The exploration rate of an episode is taken from its first record.
    pub fn from_records(records: &[EpisodeRecord], window: usize) -> Self {
        let mut grouped: BTreeMap<usize, Vec<&EpisodeRecord>> = BTreeMap::new();
        for record in records {
            grouped.entry(record.episode).or_default().push(record);
        }

        let episodes: Vec<EpisodeStats> = grouped
            .into_iter()
            .map(|(episode, rows)| {
                let n = rows.len() as f64;
                let reached = rows
                    .iter()
                    .filter(|r| r.status == EpisodeStatus::ReachedGoal)
                    .count();
                EpisodeStats {
                    episode,
                    agents: rows.len(),
                    mean_reward: rows.iter().map(|r| r.total_reward).sum::<f64>() / n,
                    exploration_rate: rows[0].exploration_rate,
                    success_rate: reached as f64 / n,
                }
            })
            .collect();

        let rewards: Vec<f64> = episodes.iter().map(|e| e.mean_reward).collect();
        let success: Vec<f64> = episodes.iter().map(|e| e.success_rate).collect();

        Self {
            window,
            smoothed_reward: rolling_mean(&rewards, window),
            smoothed_success: rolling_mean(&success, window),
            episodes,
        }
    }

    /// Exploration rate per episode, `(episode, rate)`.
    pub fn exploration_trajectory(&self) -> Vec<(usize, f64)> {
        self.episodes
            .iter()
            .map(|e| (e.episode, e.exploration_rate))
            .collect()
    }

    /// Share of all agent-episodes that reached the goal.
    pub fn overall_success_rate(&self) -> f64 {
        let total: usize = self.episodes.iter().map(|e| e.agents).sum();
        if total == 0 {
            return 0.0;
        }
        let reached: f64 = self
            .episodes
            .iter()
            .map(|e| e.success_rate * e.agents as f64)
            .sum();
        reached / total as f64
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Training Report ({} episodes, window {}) ===",
            self.episodes.len(),
            self.window
        )?;
        let (Some(last), Some(reward), Some(success)) = (
            self.episodes.last(),
            self.smoothed_reward.last(),
            self.smoothed_success.last(),
        ) else {
            return writeln!(f, "  No records.");
        };
        writeln!(f, "  Final epsilon:             {:.4}", last.exploration_rate)?;
        writeln!(f, "  Last episode mean reward:  {:.2}", last.mean_reward)?;
        writeln!(f, "  Rolling mean reward:       {:.2}", reward)?;
        writeln!(f, "  Rolling success rate:      {:.1}%", success * 100.0)?;
        writeln!(
            f,
            "  Overall success rate:      {:.1}%",
            self.overall_success_rate() * 100.0
        )
    }
}

/// Trailing rolling mean over `window` values; the first entries average
/// whatever is available. A zero window is treated as 1.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(sum / (i + 1).min(window) as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(episode: usize, agent: usize, reward: f64, reached: bool, rate: f64) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            agent,
            total_reward: reward,
            status: if reached {
                EpisodeStatus::ReachedGoal
            } else {
                EpisodeStatus::TimedOut
            },
            exploration_rate: rate,
        }
    }

    #[test]
    fn rolling_mean_uses_partial_windows() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(rolling_mean(&values, 2), vec![1.0, 1.5, 2.5, 3.5, 4.5]);
        assert_eq!(rolling_mean(&values, 10), vec![1.0, 1.5, 2.0, 2.5, 3.0]);
        assert_eq!(rolling_mean(&values, 0), values.to_vec());
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn report_groups_by_episode() {
        let records = vec![
            record(1, 0, 10.0, true, 0.9),
            record(1, 1, -2.0, false, 0.9),
            record(2, 0, 20.0, true, 0.8),
            record(2, 1, 30.0, true, 0.8),
        ];
        let report = TrainingReport::from_records(&records, 2);
        assert_eq!(report.episodes.len(), 2);
        assert_eq!(report.episodes[0].mean_reward, 4.0);
        assert_eq!(report.episodes[0].success_rate, 0.5);
        assert_eq!(report.episodes[1].mean_reward, 25.0);
        assert_eq!(report.episodes[1].success_rate, 1.0);
        assert_eq!(report.smoothed_reward, vec![4.0, 14.5]);
        assert_eq!(report.smoothed_success, vec![0.5, 0.75]);
        assert_eq!(report.exploration_trajectory(), vec![(1, 0.9), (2, 0.8)]);
        assert_eq!(report.overall_success_rate(), 0.75);
    }

    #[test]
    fn records_out_of_order_are_sorted_by_episode() {
        let records = vec![record(3, 0, 1.0, false, 0.5), record(1, 0, 2.0, true, 0.7)];
        let report = TrainingReport::from_records(&records, DEFAULT_WINDOW);
        let order: Vec<usize> = report.episodes.iter().map(|e| e.episode).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn display_handles_empty_report() {
        let report = TrainingReport::from_records(&[], DEFAULT_WINDOW);
        let text = report.to_string();
        assert!(text.contains("0 episodes"));
        assert!(text.contains("No records."));
    }

    #[test]
    fn display_shows_success_rate() {
        let records = vec![record(1, 0, 5.0, true, 0.5), record(1, 1, 5.0, false, 0.5)];
        let text = TrainingReport::from_records(&records, DEFAULT_WINDOW).to_string();
        assert!(text.contains("50.0%"));
    }
}
