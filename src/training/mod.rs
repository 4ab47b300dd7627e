//! Training loop, exploration schedule, metrics records and their sinks.

mod error;
mod exploration;
mod observer;
mod record;
mod sink;
mod trainer;

#[cfg(test)]
mod tests;

pub use error::{SinkError, TrainingError};
pub use exploration::ExplorationSchedule;
pub use observer::TrainingObserver;
pub use record::{EpisodeRecord, EpisodeStatus, EpisodeSummary};
pub(crate) use sink::LogRow;
pub use sink::{CsvLogSink, MemorySink, MetricsSink, CSV_COLUMNS, CSV_HEADER};
pub use trainer::{Trainer, TrainingSummary};
