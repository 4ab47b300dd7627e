//! Core spatial types: cells, actions and the goal-relative observation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell `(x, y)` on a square grid, `0 <= x, y < size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns true if the cell lies on a grid of side `size`.
    pub fn in_bounds(&self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    /// The neighbouring cell reached by `action`, or `None` if it would leave
    /// a grid of side `size`.
    pub fn moved(&self, action: Action, size: usize) -> Option<Cell> {
        let (dx, dy) = action.delta();
        let upper = |s: usize| (s < size).then_some(s);
        let x = self.x.checked_add_signed(dx).and_then(upper)?;
        let y = self.y.checked_add_signed(dy).and_then(upper)?;
        Some(Cell { x, y })
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(&self, other: &Cell) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Offset of an agent from the goal, `agent - goal`.
///
/// This is the learning state key: two agents at different absolute cells but
/// with the same offset share the same table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Observation {
    pub dx: i64,
    pub dy: i64,
}

impl Observation {
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }

    /// Observation of an agent standing on `agent` while the goal is `goal`.
    pub fn relative(agent: Cell, goal: Cell) -> Self {
        Self {
            dx: agent.x as i64 - goal.x as i64,
            dy: agent.y as i64 - goal.y as i64,
        }
    }
}

/// One of the four unit moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Number of actions.
    pub const COUNT: usize = Self::ALL.len();

    /// Unit displacement `(dx, dy)`; `Up` decreases `y`.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Returns the index of this action (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Down => write!(f, "down"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}
