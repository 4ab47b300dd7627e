use thiserror::Error;

/// Errors raised when a [`super::SimConfig`] describes an impossible run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("learning rate must be in (0, 1], got {0}")]
    LearningRate(f64),

    #[error("discount factor must be in [0, 1], got {0}")]
    DiscountFactor(f64),

    #[error("episode count must be at least 1")]
    NoEpisodes,

    #[error("exploration rates must satisfy 0 <= min ({min}) <= start ({start}) <= 1")]
    ExplorationBounds { start: f64, min: f64 },

    #[error("exploration decay must be in (0, 1], got {0}")]
    ExplorationDecay(f64),

    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("agent count must be at least 1")]
    NoAgents,

    #[error("obstacle count {obstacles} leaves no room on a grid of {cells} cells")]
    TooManyObstacles { obstacles: usize, cells: usize },

    #[error("{agents} agents do not fit on the {free} free cells left after goal and obstacles")]
    TooManyAgents { agents: usize, free: usize },

    #[error("placement attempt bound must be at least 1")]
    NoPlacementAttempts,

    #[error("reward value `{0}` must be finite")]
    NonFiniteReward(&'static str),
}
