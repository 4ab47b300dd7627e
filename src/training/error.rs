use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::grid::LayoutError;

/// A metrics sink failed to persist a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("metrics sink I/O failure: {0}")]
    Io(String),

    #[error("metrics sink could not encode record: {0}")]
    Encode(String),
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        SinkError::Io(e.to_string())
    }
}

impl From<csv::Error> for SinkError {
    fn from(e: csv::Error) -> Self {
        match e.kind() {
            csv::ErrorKind::Io(io) => SinkError::Io(io.to_string()),
            _ => SinkError::Encode(e.to_string()),
        }
    }
}

/// Fatal errors that stop a training run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("layout generation failed in episode {episode}: {source}")]
    Layout {
        episode: usize,
        #[source]
        source: LayoutError,
    },
}
