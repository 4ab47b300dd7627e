//! Destinations for episode records.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};

use super::error::SinkError;
use super::record::{EpisodeRecord, EpisodeStatus};

/// Column names of the CSV log, in order.
pub const CSV_COLUMNS: [&str; 5] = ["Episode", "Agent", "TotalReward", "Status", "Epsilon"];

/// Header row written by [`CsvLogSink`].
pub const CSV_HEADER: &str = "Episode,Agent,TotalReward,Status,Epsilon";

/// Append-only consumer of episode records.
pub trait MetricsSink {
    /// Appends one record.
    fn record(&mut self, record: &EpisodeRecord) -> Result<(), SinkError>;

    /// Flushes buffered records. Called once after training.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<EpisodeRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsSink for MemorySink {
    fn record(&mut self, record: &EpisodeRecord) -> Result<(), SinkError> {
        self.records.push(*record);
        Ok(())
    }
}

/// One row of the CSV log. Rewards are written with 2 decimals and
/// exploration rates with 4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct LogRow {
    #[serde(rename = "Episode")]
    episode: usize,
    #[serde(rename = "Agent")]
    agent: usize,
    #[serde(rename = "TotalReward", serialize_with = "two_decimals")]
    total_reward: f64,
    #[serde(rename = "Status")]
    status: EpisodeStatus,
    #[serde(rename = "Epsilon", serialize_with = "four_decimals")]
    exploration_rate: f64,
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

fn four_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.4}"))
}

impl From<&EpisodeRecord> for LogRow {
    fn from(r: &EpisodeRecord) -> Self {
        Self {
            episode: r.episode,
            agent: r.agent,
            total_reward: r.total_reward,
            status: r.status,
            exploration_rate: r.exploration_rate,
        }
    }
}

impl From<LogRow> for EpisodeRecord {
    fn from(row: LogRow) -> Self {
        Self {
            episode: row.episode,
            agent: row.agent,
            total_reward: row.total_reward,
            status: row.status,
            exploration_rate: row.exploration_rate,
        }
    }
}

/// Comma-separated log with a header row, see [`CSV_HEADER`].
#[derive(Debug)]
pub struct CsvLogSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvLogSink<W> {
    /// Wraps `writer` and writes the header row.
    pub fn new(writer: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(CSV_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    /// Flushes pending rows and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.error().to_string()))
    }
}

impl CsvLogSink<BufWriter<File>> {
    /// Creates (or truncates) the log file at `path`, creating parent
    /// directories as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> MetricsSink for CsvLogSink<W> {
    fn record(&mut self, record: &EpisodeRecord) -> Result<(), SinkError> {
        self.writer.serialize(LogRow::from(record))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
