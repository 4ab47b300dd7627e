//! Static per-episode layout: the goal cell and the obstacle set.

use std::collections::BTreeSet;

use rand::Rng;

use super::error::{Entity, LayoutError};
use super::types::Cell;
use crate::config::GridConfig;

/// Goal and obstacles of one episode.
///
/// Invariants: every cell is inside the grid, the goal is not an obstacle.
/// Obstacles are stored in a `BTreeSet` so iteration order is stable across
/// runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    size: usize,
    goal: Cell,
    obstacles: BTreeSet<Cell>,
}

impl Layout {
    /// Builds a layout from explicit cells, checking its invariants.
    pub fn new(
        size: usize,
        goal: Cell,
        obstacles: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, LayoutError> {
        if !goal.in_bounds(size) {
            return Err(LayoutError::CellOutOfBounds {
                entity: Entity::Goal,
                cell: goal,
                size,
            });
        }
        let obstacles: BTreeSet<Cell> = obstacles.into_iter().collect();
        if let Some(cell) = obstacles.iter().find(|c| !c.in_bounds(size)) {
            return Err(LayoutError::CellOutOfBounds {
                entity: Entity::Obstacle,
                cell: *cell,
                size,
            });
        }
        if obstacles.contains(&goal) {
            return Err(LayoutError::GoalOnObstacle(goal));
        }
        Ok(Self {
            size,
            goal,
            obstacles,
        })
    }

    /// Draws a random layout: the goal first, then `grid.obstacles` distinct
    /// obstacles, each redrawn on collision with the goal or an earlier one.
    ///
    /// Fails with [`LayoutError::GridTooSmall`] before drawing anything when
    /// the grid cannot hold the goal plus all obstacles, and with
    /// [`LayoutError::PlacementExhausted`] when a single placement exceeds
    /// `grid.max_placement_attempts` draws. The layout is never under-filled.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, grid: &GridConfig) -> Result<Self, LayoutError> {
        let required = grid.obstacles + 1;
        let available = grid.cell_count();
        if required > available {
            return Err(LayoutError::GridTooSmall {
                required,
                available,
            });
        }

        let attempts = grid.max_placement_attempts;
        let goal = place_random(rng, grid.size, attempts, Entity::Goal, |_| false)?;
        let mut obstacles = BTreeSet::new();
        while obstacles.len() < grid.obstacles {
            let cell = place_random(rng, grid.size, attempts, Entity::Obstacle, |c| {
                c == goal || obstacles.contains(&c)
            })?;
            obstacles.insert(cell);
        }

        Ok(Self {
            size: grid.size,
            goal,
            obstacles,
        })
    }

    /// Side length of the grid this layout belongs to.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn obstacles(&self) -> &BTreeSet<Cell> {
        &self.obstacles
    }

    pub fn is_obstacle(&self, cell: &Cell) -> bool {
        self.obstacles.contains(cell)
    }

    /// Number of cells that are neither the goal nor an obstacle.
    pub fn free_cells(&self) -> usize {
        self.size * self.size - self.obstacles.len() - 1
    }
}

/// Draws uniform cells until one is not `excluded`, giving up after
/// `max_attempts` draws.
pub(crate) fn place_random<R, F>(
    rng: &mut R,
    size: usize,
    max_attempts: usize,
    entity: Entity,
    excluded: F,
) -> Result<Cell, LayoutError>
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    for _ in 0..max_attempts {
        let cell = Cell::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !excluded(cell) {
            return Ok(cell);
        }
    }
    Err(LayoutError::PlacementExhausted {
        entity,
        attempts: max_attempts,
    })
}
