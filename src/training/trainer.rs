//! Episode loop for independent Q-learners on the shared grid.
//!
//! Each episode runs through the same phases: layout reset, position reset,
//! exploration decay, stepping until every agent reached the goal or the tick
//! budget ran out, and finally one record per agent.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::error::TrainingError;
use super::exploration::ExplorationSchedule;
use super::observer::TrainingObserver;
use super::record::{EpisodeRecord, EpisodeStatus, EpisodeSummary};
use super::sink::MetricsSink;
use crate::config::SimConfig;
use crate::environment::Environment;
use crate::grid::{Cell, Layout, LayoutError};
use crate::learner::QAgent;

/// Offset between the environment seed and the action-selection seed.
const POLICY_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub final_exploration_rate: f64,
    /// Goal reaches summed over all agents and episodes.
    pub goal_reaches: usize,
    /// Records the sink failed to persist.
    pub dropped_records: usize,
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Training Summary ({} episodes) ===", self.episodes)?;
        writeln!(f, "  Final epsilon:    {:.4}", self.final_exploration_rate)?;
        writeln!(f, "  Goal reaches:     {}", self.goal_reaches)?;
        writeln!(f, "  Dropped records:  {}", self.dropped_records)
    }
}

/// Drives the whole run: one [`Environment`], one [`QAgent`] per agent, and a
/// shared [`ExplorationSchedule`].
///
/// Agents act strictly in index order within a tick, so agent `i` sees the
/// positions agents `0..i` committed earlier in the same tick.
pub struct Trainer {
    config: SimConfig,
    env: Environment,
    agents: Vec<QAgent>,
    exploration: ExplorationSchedule,
    rng: StdRng,
    observers: Vec<Box<dyn TrainingObserver>>,
    dropped_records: usize,
}

impl fmt::Debug for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trainer")
            .field("config", &self.config)
            .field("env", &self.env)
            .field("agents", &self.agents.len())
            .field("exploration", &self.exploration)
            .field("observers", &self.observers.len())
            .field("dropped_records", &self.dropped_records)
            .finish()
    }
}

impl Trainer {
    /// Validates `config` and builds the environment and agents.
    ///
    /// Fails before any episode runs if the configuration is invalid or the
    /// first layout cannot be placed.
    pub fn new(config: SimConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let env = Environment::new(&config)
            .map_err(|source| TrainingError::Layout { episode: 0, source })?;
        let agents = (0..config.grid.agents)
            .map(|id| QAgent::new(id, config.learning))
            .collect();

        Ok(Self {
            env,
            agents,
            exploration: ExplorationSchedule::new(&config.exploration),
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(POLICY_SEED_OFFSET)),
            observers: Vec::new(),
            dropped_records: 0,
            config,
        })
    }

    /// Attaches an observer invoked at every tick and episode end.
    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    /// Runs all configured episodes, emitting records to `sink`.
    ///
    /// Sink failures are logged and counted but never stop training. A layout
    /// failure aborts the run.
    pub fn run(&mut self, sink: &mut dyn MetricsSink) -> Result<TrainingSummary, TrainingError> {
        info!(
            "Starting training: {} episodes, {} agents, {}x{} grid, {} obstacles",
            self.config.episodes,
            self.config.grid.agents,
            self.config.grid.size,
            self.config.grid.size,
            self.config.grid.obstacles
        );

        let mut goal_reaches = 0;
        for episode in 1..=self.config.episodes {
            let summary = self.run_episode(episode, sink)?;
            goal_reaches += summary.goal_reaches();

            let interval = self.config.progress_interval;
            if interval > 0 && episode % interval == 0 {
                info!(
                    "Episode: {}/{} | Epsilon: {:.4} | Avg. Reward: {:.2} | Reached goal: {}/{}",
                    episode,
                    self.config.episodes,
                    summary.exploration_rate,
                    summary.mean_reward(),
                    summary.goal_reaches(),
                    self.agents.len()
                );
            }
        }

        if let Err(e) = sink.flush() {
            warn!("Failed to flush metrics sink: {e}");
        }

        let summary = TrainingSummary {
            episodes: self.config.episodes,
            final_exploration_rate: self.exploration.rate(),
            goal_reaches,
            dropped_records: self.dropped_records,
        };
        info!(
            "Training finished: {} goal reaches, {} dropped records",
            summary.goal_reaches, summary.dropped_records
        );
        Ok(summary)
    }

    /// Runs one full episode: reset layout and positions, decay exploration,
    /// step, then emit records.
    pub fn run_episode(
        &mut self,
        episode: usize,
        sink: &mut dyn MetricsSink,
    ) -> Result<EpisodeSummary, TrainingError> {
        let layout_failed = |source| TrainingError::Layout { episode, source };
        let goal = self.env.reset_layout().map_err(layout_failed)?.goal();
        self.env
            .reset_positions(self.agents.len())
            .map_err(layout_failed)?;
        debug!("Episode {episode}: layout regenerated, goal at {goal}");

        let rate = self.exploration.decay();
        let summary = self.play_episode(episode, rate);
        self.emit(&summary, sink);
        Ok(summary)
    }

    /// Steps the current layout and positions without resetting anything.
    ///
    /// Every unfinished agent acts once per tick, in index order. An agent
    /// finishes only by reaching the goal; collisions leave it in play. Stops
    /// early when all agents finished, otherwise after
    /// [`GridConfig::step_budget`](crate::config::GridConfig::step_budget)
    /// ticks. Unfinished agents are recorded as [`EpisodeStatus::TimedOut`].
    pub fn play_episode(&mut self, episode: usize, exploration_rate: f64) -> EpisodeSummary {
        let n = self.agents.len();
        let mut rewards = vec![0.0; n];
        let mut finished = vec![false; n];
        let mut ticks = 0;

        for tick in 0..self.config.grid.step_budget() {
            for id in 0..n {
                if finished[id] {
                    continue;
                }
                let agent = &mut self.agents[id];
                let observation = self.env.observe(id);
                let action = agent.select_action(observation, exploration_rate, &mut self.rng);
                let outcome = self.env.step(id, action);
                agent.update(observation, action, outcome.reward, outcome.observation);
                rewards[id] += outcome.reward;
                finished[id] = outcome.terminal;
            }
            ticks = tick + 1;

            let snapshot = self.env.snapshot();
            for observer in &mut self.observers {
                observer.on_tick(episode, tick, &snapshot);
            }

            if finished.iter().all(|&f| f) {
                break;
            }
        }

        let records = (0..n)
            .map(|agent| EpisodeRecord {
                episode,
                agent,
                total_reward: rewards[agent],
                status: if finished[agent] {
                    EpisodeStatus::ReachedGoal
                } else {
                    EpisodeStatus::TimedOut
                },
                exploration_rate,
            })
            .collect();

        EpisodeSummary {
            episode,
            ticks,
            exploration_rate,
            records,
        }
    }

    fn emit(&mut self, summary: &EpisodeSummary, sink: &mut dyn MetricsSink) {
        for record in &summary.records {
            if let Err(e) = sink.record(record) {
                warn!(
                    "Dropping record for episode {} agent {}: {e}",
                    record.episode, record.agent
                );
                self.dropped_records += 1;
            }
        }
        for observer in &mut self.observers {
            observer.on_episode_end(summary);
        }
    }

    /// Replaces the current layout; see [`Environment::set_layout`].
    pub fn set_layout(&mut self, layout: Layout) -> Result<(), LayoutError> {
        self.env.set_layout(layout)
    }

    /// Places every agent explicitly; one cell per agent is required.
    pub fn place_agents(&mut self, positions: Vec<Cell>) -> Result<(), LayoutError> {
        if positions.len() != self.agents.len() {
            return Err(LayoutError::AgentCountMismatch {
                expected: self.agents.len(),
                actual: positions.len(),
            });
        }
        self.env.set_positions(positions)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn agents(&self) -> &[QAgent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [QAgent] {
        &mut self.agents
    }

    /// Current shared exploration rate.
    pub fn exploration_rate(&self) -> f64 {
        self.exploration.rate()
    }
}
