use std::fmt;

use thiserror::Error;

use super::types::Cell;

/// Kind of entity being placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Goal,
    Obstacle,
    Agent,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Goal => write!(f, "goal"),
            Entity::Obstacle => write!(f, "obstacle"),
            Entity::Agent => write!(f, "agent"),
        }
    }
}

/// Errors raised while building a layout or placing agents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("grid has {available} cells but {required} are needed")]
    GridTooSmall { required: usize, available: usize },

    #[error("could not place {entity} after {attempts} attempts")]
    PlacementExhausted { entity: Entity, attempts: usize },

    #[error("{entity} cell {cell} is outside a grid of size {size}")]
    CellOutOfBounds {
        entity: Entity,
        cell: Cell,
        size: usize,
    },

    #[error("goal {0} coincides with an obstacle")]
    GoalOnObstacle(Cell),

    #[error("agent cell {0} is not free")]
    CellOccupied(Cell),

    #[error("layout is for a grid of size {actual}, environment expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("expected {expected} agent positions, got {actual}")]
    AgentCountMismatch { expected: usize, actual: usize },
}
