//! marlgrid - independent tabular Q-learners on a shared grid
//!
//! Many agents learn, each with its own Q-table, to reach a common goal on a
//! discrete grid while avoiding static obstacles and each other. The core is
//! the [`environment::Environment`] transition function, the per-agent
//! [`learner::QAgent`] and the [`training::Trainer`] episode loop; metrics
//! sinks, rendering and reporting are optional collaborators around it.

pub mod config;
pub mod environment;
pub mod grid;
pub mod learner;
pub mod render;
pub mod report;
pub mod training;

pub use config::SimConfig;
pub use environment::{Environment, StepOutcome, StepStatus};
pub use grid::{Action, Cell, Layout, Observation};
pub use learner::{QAgent, QTable};
pub use training::{Trainer, TrainingError};
