//! The shared grid environment and its reward function.

mod env;
mod reward;

pub use env::{Environment, GridSnapshot, StepOutcome, StepStatus};
pub use reward::RewardComputer;
