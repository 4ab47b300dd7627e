//! Reader for logs written by [`CsvLogSink`](crate::training::CsvLogSink).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::ReportError;
use crate::training::{EpisodeRecord, LogRow, CSV_COLUMNS};

/// Parses every record of a CSV metrics log.
pub fn read_log<R: Read>(reader: R) -> Result<Vec<EpisodeRecord>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    if !reader.headers()?.iter().eq(CSV_COLUMNS) {
        return Err(ReportError::MissingHeader);
    }

    reader
        .deserialize::<LogRow>()
        .map(|row| row.map(EpisodeRecord::from).map_err(ReportError::from))
        .collect()
}

/// Opens and parses the log at `path`.
pub fn read_log_file(path: impl AsRef<Path>) -> Result<Vec<EpisodeRecord>, ReportError> {
    read_log(File::open(path)?)
}
