//! Per-agent tabular Q-learning.

mod agent;
mod q_table;

pub use agent::QAgent;
pub use q_table::QTable;
