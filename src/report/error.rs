use std::io;

use thiserror::Error;

use crate::training::CSV_COLUMNS;

/// Errors raised while reading a persisted metrics log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("failed to read metrics log: {0}")]
    Io(String),

    #[error("metrics log is empty or lacks the header row")]
    MissingHeader,

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl From<io::Error> for ReportError {
    fn from(e: io::Error) -> Self {
        ReportError::Io(e.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map_or(0, |p| p.line() as usize);
        let reason = match e.kind() {
            csv::ErrorKind::Io(io) => return ReportError::Io(io.to_string()),
            csv::ErrorKind::Deserialize { err, .. } => {
                let column = err
                    .field()
                    .and_then(|i| CSV_COLUMNS.get(i as usize))
                    .copied()
                    .unwrap_or("row");
                format!("bad {column}: {}", err.kind())
            }
            csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
                format!("expected {expected_len} fields, found {len}")
            }
            _ => e.to_string(),
        };
        ReportError::Malformed { line, reason }
    }
}
