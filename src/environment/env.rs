//! Multi-agent grid environment.
//!
//! Owns the episode layout and the live agent positions, and implements the
//! transition function: wall, obstacle and agent collisions, distance-shaped
//! step rewards and goal detection.

use std::collections::BTreeSet;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::reward::RewardComputer;
use crate::config::{GridConfig, RewardConfig, SimConfig};
use crate::grid::{place_random, Action, Cell, Entity, Layout, LayoutError, Observation};

/// How a single move was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The agent moved to a free cell.
    Moved,
    /// The agent moved onto the goal.
    ReachedGoal,
    /// The target cell was outside the grid.
    WallCollision,
    /// The target cell holds an obstacle.
    ObstacleCollision,
    /// The target cell holds another agent and is not the goal.
    AgentCollision,
}

impl StepStatus {
    /// Returns true if the move was rejected and the agent did not move.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            StepStatus::WallCollision | StepStatus::ObstacleCollision | StepStatus::AgentCollision
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Moved => "Moving",
            StepStatus::ReachedGoal => "ReachedGoal",
            StepStatus::WallCollision => "WallCollision",
            StepStatus::ObstacleCollision => "ObstacleCollision",
            StepStatus::AgentCollision => "AgentCollision",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single agent step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Observation of the agent after the step.
    pub observation: Observation,
    pub reward: f64,
    /// True only when the agent reached the goal.
    pub terminal: bool,
    pub status: StepStatus,
}

/// Read-only view of the grid handed to render and observer hooks.
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshot<'a> {
    pub size: usize,
    pub goal: Cell,
    pub obstacles: &'a BTreeSet<Cell>,
    pub agents: &'a [Cell],
}

/// The shared grid world.
///
/// Steps are resolved one agent at a time. Collision checks read the current
/// positions of all other agents, so within a tick an agent sees the moves of
/// every agent processed before it.
///
/// # Lifecycle
///
/// 1. Call [`Environment::new`] with the run configuration.
/// 2. At the start of each episode call [`Environment::reset_layout`] and
///    [`Environment::reset_positions`].
/// 3. Call [`Environment::observe`] and [`Environment::step`] per agent.
#[derive(Debug)]
pub struct Environment {
    grid: GridConfig,
    rewards: RewardConfig,
    layout: Layout,
    positions: Vec<Cell>,
    rng: StdRng,
}

impl Environment {
    /// Creates an environment seeded from `config.seed` with a first layout
    /// and agent placement already drawn.
    pub fn new(config: &SimConfig) -> Result<Self, LayoutError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let layout = Layout::generate(&mut rng, &config.grid)?;
        let mut env = Self {
            grid: config.grid,
            rewards: config.rewards,
            layout,
            positions: Vec::new(),
            rng,
        };
        env.reset_positions(config.grid.agents)?;
        Ok(env)
    }

    /// Draws a fresh goal and obstacle set.
    pub fn reset_layout(&mut self) -> Result<&Layout, LayoutError> {
        self.layout = Layout::generate(&mut self.rng, &self.grid)?;
        Ok(&self.layout)
    }

    /// Places `agent_count` agents uniformly on cells free of obstacles, the
    /// goal, and agents placed earlier in the same call.
    pub fn reset_positions(&mut self, agent_count: usize) -> Result<&[Cell], LayoutError> {
        let available = self.layout.free_cells();
        if agent_count > available {
            return Err(LayoutError::GridTooSmall {
                required: agent_count + self.layout.obstacles().len() + 1,
                available: self.grid.cell_count(),
            });
        }

        let mut placed: Vec<Cell> = Vec::with_capacity(agent_count);
        for _ in 0..agent_count {
            let cell = place_random(
                &mut self.rng,
                self.grid.size,
                self.grid.max_placement_attempts,
                Entity::Agent,
                |c| c == self.layout.goal() || self.layout.is_obstacle(&c) || placed.contains(&c),
            )?;
            placed.push(cell);
        }
        self.positions = placed;
        Ok(&self.positions)
    }

    /// Replaces the layout with an explicit one.
    ///
    /// Agent positions are kept while none of them lands on an obstacle of
    /// the new layout; otherwise every agent is re-placed as in
    /// [`Environment::reset_positions`]. On error the previous layout stays.
    pub fn set_layout(&mut self, layout: Layout) -> Result<(), LayoutError> {
        if layout.size() != self.grid.size {
            return Err(LayoutError::SizeMismatch {
                expected: self.grid.size,
                actual: layout.size(),
            });
        }
        let previous = std::mem::replace(&mut self.layout, layout);
        if self.positions.iter().any(|p| self.layout.is_obstacle(p)) {
            if let Err(e) = self.reset_positions(self.positions.len()) {
                self.layout = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Places agents on explicit cells.
    ///
    /// Cells must be inside the grid, off obstacles, and pairwise distinct
    /// except on the goal, which any number of agents may share.
    pub fn set_positions(&mut self, positions: Vec<Cell>) -> Result<(), LayoutError> {
        for (i, cell) in positions.iter().enumerate() {
            if !cell.in_bounds(self.grid.size) {
                return Err(LayoutError::CellOutOfBounds {
                    entity: Entity::Agent,
                    cell: *cell,
                    size: self.grid.size,
                });
            }
            let shared = *cell != self.layout.goal() && positions[..i].contains(cell);
            if self.layout.is_obstacle(cell) || shared {
                return Err(LayoutError::CellOccupied(*cell));
            }
        }
        self.positions = positions;
        Ok(())
    }

    /// Observation of `agent`: its offset from the goal.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is not a valid agent index.
    pub fn observe(&self, agent: usize) -> Observation {
        Observation::relative(self.positions[agent], self.layout.goal())
    }

    /// Resolves one move of `agent`.
    ///
    /// Checks run in order and the first hit short-circuits: leaving the grid,
    /// hitting an obstacle, hitting another agent off the goal. A rejected
    /// move earns the collision penalty and leaves the agent in place.
    /// Otherwise the agent moves and earns the shaped step reward, or the
    /// goal bonus with `terminal = true` when it lands on the goal.
    ///
    /// # Panics
    ///
    /// Panics if `agent` is not a valid agent index.
    pub fn step(&mut self, agent: usize, action: Action) -> StepOutcome {
        let current = self.positions[agent];
        let goal = self.layout.goal();

        let status = match current.moved(action, self.grid.size) {
            None => StepStatus::WallCollision,
            Some(target) if self.layout.is_obstacle(&target) => StepStatus::ObstacleCollision,
            Some(target) if target != goal && self.is_occupied_by_other(agent, target) => {
                StepStatus::AgentCollision
            }
            Some(target) => {
                let reward = RewardComputer::movement(&self.rewards, current, target, goal);
                self.positions[agent] = target;
                let reached = target == goal;
                return StepOutcome {
                    observation: self.observe(agent),
                    reward,
                    terminal: reached,
                    status: if reached {
                        StepStatus::ReachedGoal
                    } else {
                        StepStatus::Moved
                    },
                };
            }
        };

        StepOutcome {
            observation: self.observe(agent),
            reward: RewardComputer::collision(&self.rewards),
            terminal: false,
            status,
        }
    }

    fn is_occupied_by_other(&self, agent: usize, cell: Cell) -> bool {
        self.positions
            .iter()
            .enumerate()
            .any(|(i, pos)| i != agent && *pos == cell)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn goal(&self) -> Cell {
        self.layout.goal()
    }

    pub fn obstacles(&self) -> &BTreeSet<Cell> {
        self.layout.obstacles()
    }

    /// Current agent positions, indexed by agent id.
    pub fn positions(&self) -> &[Cell] {
        &self.positions
    }

    /// Returns the number of agents.
    pub fn n_agents(&self) -> usize {
        self.positions.len()
    }

    pub fn grid_size(&self) -> usize {
        self.grid.size
    }

    /// Read-only view of the current layout and positions.
    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot {
            size: self.grid.size,
            goal: self.layout.goal(),
            obstacles: self.layout.obstacles(),
            agents: &self.positions,
        }
    }
}
