//! CSV ledger pairing image filenames with steering labels.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

pub const LEDGER_HEADER: [&str; 2] = ["image_filename", "steering_angle"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub image_filename: String,
    pub steering_angle: f64,
}

/// Append-only ledger. Every row is flushed as soon as it is written.
pub struct LedgerWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: u64,
}

impl LedgerWriter {
    /// Creates or truncates the ledger at `path` and writes the header.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or the header written.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(DatasetError::ledger(&path))?;
        writer
            .write_record(LEDGER_HEADER)
            .map_err(DatasetError::ledger(&path))?;
        writer.flush().map_err(DatasetError::io(&path))?;
        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    /// Writes one row and flushes it to disk.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the flush fails.
    pub fn append(&mut self, record: &LedgerRecord) -> Result<(), DatasetError> {
        self.writer
            .serialize(record)
            .map_err(DatasetError::ledger(&self.path))?;
        self.writer.flush().map_err(DatasetError::io(&self.path))?;
        self.rows += 1;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written since the ledger was created, header excluded.
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

/// Reads every well-formed row of a ledger. Malformed rows are logged and
/// skipped.
///
/// # Errors
///
/// Fails if the file cannot be opened or its header cannot be read.
pub fn read_ledger(path: impl AsRef<Path>) -> Result<Vec<LedgerRecord>, DatasetError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(DatasetError::ledger(path))?;
    reader.headers().map_err(DatasetError::ledger(path))?;

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<LedgerRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("skipping malformed row {} in {}: {}", row + 1, path.display(), e),
        }
    }
    Ok(records)
}
