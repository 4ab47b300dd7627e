//! Scenario tests for the training loop.

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::SimConfig;
use crate::environment::{Environment, GridSnapshot, StepStatus};
use crate::grid::{Action, Cell, Layout, LayoutError, Observation};

/// Helper for a small, fast configuration.
fn config(size: usize, agents: usize, obstacles: usize, episodes: usize) -> SimConfig {
    let mut config = SimConfig::default();
    config.grid.size = size;
    config.grid.agents = agents;
    config.grid.obstacles = obstacles;
    config.episodes = episodes;
    config.progress_interval = 0;
    config
}

#[derive(Default)]
struct Counts {
    ticks: usize,
    episodes: Vec<EpisodeSummary>,
    goals: Vec<Cell>,
}

/// Observer recording hook calls into shared state.
struct Recorder(Rc<RefCell<Counts>>);

impl TrainingObserver for Recorder {
    fn on_tick(&mut self, _episode: usize, tick: usize, grid: &GridSnapshot<'_>) {
        let mut counts = self.0.borrow_mut();
        counts.ticks += 1;
        if tick == 0 {
            counts.goals.push(grid.goal);
        }
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        self.0.borrow_mut().episodes.push(summary.clone());
    }
}

/// Sink that rejects every record.
struct FailingSink;

impl MetricsSink for FailingSink {
    fn record(&mut self, _record: &EpisodeRecord) -> Result<(), SinkError> {
        Err(SinkError::Io("read-only filesystem".to_string()))
    }
}

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn single_agent_follows_seeded_table_to_goal() {
        let mut trainer = Trainer::new(config(5, 1, 0, 1)).unwrap();
        trainer
            .set_layout(Layout::new(5, Cell::new(4, 4), []).unwrap())
            .unwrap();
        trainer.place_agents(vec![Cell::new(0, 0)]).unwrap();

        // Prefer moving right/down everywhere on the way to the goal.
        let table = trainer.agents_mut()[0].table_mut();
        for dx in -4..=0 {
            for dy in -4..=0 {
                let obs = Observation::new(dx, dy);
                if dx < 0 {
                    table.set(obs, Action::Right, 1.0);
                }
                if dy < 0 {
                    table.set(obs, Action::Down, 1.0);
                }
            }
        }

        let summary = trainer.play_episode(1, 0.0);
        assert_eq!(summary.ticks, 8);
        let record = summary.records[0];
        assert_eq!(record.status, EpisodeStatus::ReachedGoal);
        // Seven shaped steps of (-0.15 + 0.05) then the goal bonus.
        assert!((record.total_reward - (300.0 - 0.7)).abs() < 1e-9);
        assert_eq!(trainer.environment().positions(), &[Cell::new(4, 4)]);
    }

    #[test]
    fn swap_attempt_rejects_first_mover() {
        let mut env = Environment::new(&config(5, 2, 0, 1)).unwrap();
        env.set_layout(Layout::new(5, Cell::new(4, 4), []).unwrap())
            .unwrap();
        env.set_positions(vec![Cell::new(1, 1), Cell::new(2, 1)])
            .unwrap();

        // A then B, each aiming at the other's cell.
        let a = env.step(0, Action::Right);
        assert_eq!(a.status, StepStatus::AgentCollision);
        assert_eq!(a.reward, -10.0);
        assert_eq!(env.positions(), &[Cell::new(1, 1), Cell::new(2, 1)]);

        // A never left its cell, so B collides with it too.
        let b = env.step(1, Action::Left);
        assert_eq!(b.status, StepStatus::AgentCollision);
        assert_eq!(env.positions(), &[Cell::new(1, 1), Cell::new(2, 1)]);
    }

    #[test]
    fn fully_obstructed_agent_never_moves() {
        for rate in [0.0, 0.5, 1.0] {
            let mut trainer = Trainer::new(config(5, 1, 0, 1)).unwrap();
            trainer
                .set_layout(
                    Layout::new(5, Cell::new(4, 4), [Cell::new(1, 0), Cell::new(0, 1)]).unwrap(),
                )
                .unwrap();
            trainer.place_agents(vec![Cell::new(0, 0)]).unwrap();

            let summary = trainer.play_episode(1, rate);
            let budget = trainer.config().grid.step_budget();
            assert_eq!(summary.ticks, budget);
            assert_eq!(summary.records[0].status, EpisodeStatus::TimedOut);
            assert!((summary.records[0].total_reward - (-10.0 * budget as f64)).abs() < 1e-9);
            assert_eq!(trainer.environment().positions(), &[Cell::new(0, 0)]);
        }
    }

    #[test]
    fn new_layout_never_leaves_agent_on_obstacle() {
        let mut trainer = Trainer::new(config(5, 1, 0, 1)).unwrap();
        trainer
            .set_layout(Layout::new(5, Cell::new(4, 4), []).unwrap())
            .unwrap();
        trainer.place_agents(vec![Cell::new(2, 2)]).unwrap();

        trainer
            .set_layout(Layout::new(5, Cell::new(4, 4), [Cell::new(2, 2)]).unwrap())
            .unwrap();
        let env = trainer.environment();
        assert_eq!(env.n_agents(), 1);
        assert!(!env.layout().is_obstacle(&env.positions()[0]));
    }

    #[test]
    fn finished_agents_stop_acting() {
        let mut trainer = Trainer::new(config(5, 2, 0, 1)).unwrap();
        let goal = Cell::new(2, 2);
        trainer
            .set_layout(Layout::new(5, goal, []).unwrap())
            .unwrap();
        // Agent 0 starts next to the goal, agent 1 wanders from a corner.
        trainer
            .place_agents(vec![Cell::new(2, 1), Cell::new(0, 0)])
            .unwrap();
        trainer.agents_mut()[0]
            .table_mut()
            .set(Observation::new(0, -1), Action::Down, 5.0);

        let summary = trainer.play_episode(1, 0.0);
        assert_eq!(summary.records[0].status, EpisodeStatus::ReachedGoal);
        assert_eq!(summary.records[0].total_reward, 300.0);
        assert_eq!(trainer.environment().positions()[0], goal);
    }
}

#[cfg(test)]
mod runs {
    use super::*;

    #[test]
    fn emits_one_record_per_agent_per_episode() {
        let mut trainer = Trainer::new(config(8, 3, 4, 5)).unwrap();
        let mut sink = MemorySink::new();
        let summary = trainer.run(&mut sink).unwrap();

        assert_eq!(summary.episodes, 5);
        assert_eq!(sink.records.len(), 15);
        for (i, record) in sink.records.iter().enumerate() {
            assert_eq!(record.episode, i / 3 + 1);
            assert_eq!(record.agent, i % 3);
        }
        let reached = sink
            .records
            .iter()
            .filter(|r| r.status == EpisodeStatus::ReachedGoal)
            .count();
        assert_eq!(summary.goal_reaches, reached);
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let cfg = config(8, 4, 6, 15);
        let run = || {
            let counts = Rc::new(RefCell::new(Counts::default()));
            let mut trainer = Trainer::new(cfg).unwrap();
            trainer.add_observer(Box::new(Recorder(Rc::clone(&counts))));
            let mut sink = MemorySink::new();
            trainer.run(&mut sink).unwrap();
            let goals = counts.borrow().goals.clone();
            (sink.records, goals, trainer.environment().positions().to_vec())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a_cfg = config(10, 4, 6, 5);
        let mut sink_a = MemorySink::new();
        Trainer::new(a_cfg).unwrap().run(&mut sink_a).unwrap();
        a_cfg.seed += 1;
        let mut sink_b = MemorySink::new();
        Trainer::new(a_cfg).unwrap().run(&mut sink_b).unwrap();
        assert_ne!(sink_a.records, sink_b.records);
    }

    #[test]
    fn exploration_decays_per_episode_to_floor() {
        let mut cfg = config(6, 2, 2, 40);
        cfg.exploration.decay = 0.8;
        cfg.exploration.min = 0.1;
        let mut trainer = Trainer::new(cfg).unwrap();
        let mut sink = MemorySink::new();
        let summary = trainer.run(&mut sink).unwrap();

        let mut previous = cfg.exploration.start;
        for chunk in sink.records.chunks(2) {
            let rate = chunk[0].exploration_rate;
            assert_eq!(chunk[1].exploration_rate, rate);
            assert!(rate <= previous);
            assert!(rate >= 0.1);
            previous = rate;
        }
        assert!((sink.records[0].exploration_rate - 0.8).abs() < 1e-12);
        assert_eq!(summary.final_exploration_rate, 0.1);
        assert_eq!(trainer.exploration_rate(), 0.1);
    }

    #[test]
    fn observers_see_every_tick_and_episode() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut trainer = Trainer::new(config(6, 2, 3, 4)).unwrap();
        trainer.add_observer(Box::new(Recorder(Rc::clone(&counts))));
        trainer.run(&mut MemorySink::new()).unwrap();

        let counts = counts.borrow();
        assert_eq!(counts.episodes.len(), 4);
        let ticks: usize = counts.episodes.iter().map(|s| s.ticks).sum();
        assert_eq!(counts.ticks, ticks);
        assert!(counts.episodes.iter().all(|s| s.ticks <= 24));
    }

    #[test]
    fn q_tables_persist_across_episodes() {
        let mut trainer = Trainer::new(config(6, 2, 2, 1)).unwrap();
        let mut sink = MemorySink::new();
        trainer.run_episode(1, &mut sink).unwrap();
        let after_one = trainer.agents()[0].table().len();
        assert!(after_one > 0);
        trainer.run_episode(2, &mut sink).unwrap();
        assert!(trainer.agents()[0].table().len() >= after_one);
    }

    #[test]
    fn learning_improves_goal_reaching() {
        let mut cfg = config(6, 1, 0, 300);
        cfg.exploration.decay = 0.97;
        let mut trainer = Trainer::new(cfg).unwrap();
        let mut sink = MemorySink::new();
        trainer.run(&mut sink).unwrap();
        let late_success = sink.records[250..]
            .iter()
            .filter(|r| r.status == EpisodeStatus::ReachedGoal)
            .count();
        assert!(late_success >= 35, "only {late_success} of 50 late episodes reached the goal");
    }
}

#[cfg(test)]
mod failures {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn invalid_config_stops_before_training() {
        let err = Trainer::new(config(5, 0, 0, 1)).unwrap_err();
        assert_eq!(err, TrainingError::Config(ConfigError::NoAgents));
    }

    #[test]
    fn layout_failure_aborts_run() {
        let mut cfg = config(2, 1, 2, 50);
        cfg.grid.max_placement_attempts = 1;
        let mut sink = MemorySink::new();
        let result = Trainer::new(cfg).and_then(|mut t| t.run(&mut sink));
        assert!(matches!(
            result,
            Err(TrainingError::Layout {
                source: LayoutError::PlacementExhausted { .. },
                ..
            })
        ));
    }

    #[test]
    fn sink_errors_do_not_stop_training() {
        let mut trainer = Trainer::new(config(6, 3, 2, 4)).unwrap();
        let summary = trainer.run(&mut FailingSink).unwrap();
        assert_eq!(summary.episodes, 4);
        assert_eq!(summary.dropped_records, 12);
        assert!(trainer.agents().iter().all(|a| !a.table().is_empty()));
    }

    #[test]
    fn place_agents_checks_count() {
        let mut trainer = Trainer::new(config(5, 2, 0, 1)).unwrap();
        assert_eq!(
            trainer.place_agents(vec![Cell::new(0, 0)]),
            Err(LayoutError::AgentCountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }
}
