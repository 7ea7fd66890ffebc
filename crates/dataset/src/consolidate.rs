//! Merges several generation runs into one renumbered dataset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DatasetError;
use crate::ledger::{read_ledger, LedgerRecord, LedgerWriter};
use crate::writer::{IMAGES_DIR, LEDGER_FILE};

pub const RUN_PREFIX: &str = "run_";
pub const COMBINED_IMAGES_DIR: &str = "all_images";
pub const COMBINED_LEDGER_FILE: &str = "combined_labels.csv";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsolidationSummary {
    /// Run directories whose ledgers were read
    pub runs: usize,
    /// Runs skipped for lack of a ledger
    pub skipped_runs: usize,
    /// Images copied into the combined set
    pub copied: u64,
    /// Ledger rows dropped because their image was missing
    pub missing_images: u64,
}

/// Combined image filename for global sequence number `index`.
#[must_use]
pub fn combined_filename(index: u64) -> String {
    format!("image_{index:06}.png")
}

/// Lists the `run_*` directories under `root` in name order.
///
/// # Errors
///
/// Fails if `root` cannot be listed.
pub fn find_runs(root: impl AsRef<Path>) -> Result<Vec<PathBuf>, DatasetError> {
    let root = root.as_ref();
    let mut runs = Vec::new();
    for entry in fs::read_dir(root).map_err(DatasetError::io(root))? {
        let entry = entry.map_err(DatasetError::io(root))?;
        let path = entry.path();
        let is_run = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(RUN_PREFIX));
        if is_run && path.is_dir() {
            runs.push(path);
        }
    }
    runs.sort();
    Ok(runs)
}

/// Copies every sample of every run under `root` into `out`, renumbering
/// them in one sequence and writing a combined ledger.
///
/// # Errors
///
/// Fails on I/O errors other than missing ledgers and missing images, which
/// are logged and skipped.
pub fn consolidate(
    root: impl AsRef<Path>,
    out: impl AsRef<Path>,
) -> Result<ConsolidationSummary, DatasetError> {
    let out = out.as_ref();
    let images_out = out.join(COMBINED_IMAGES_DIR);
    fs::create_dir_all(&images_out).map_err(DatasetError::io(&images_out))?;
    let mut ledger = LedgerWriter::create(out.join(COMBINED_LEDGER_FILE))?;
    let mut summary = ConsolidationSummary::default();

    for run in find_runs(root)? {
        let ledger_path = run.join(LEDGER_FILE);
        if !ledger_path.is_file() {
            tracing::warn!("{} has no {}, skipping", run.display(), LEDGER_FILE);
            summary.skipped_runs += 1;
            continue;
        }
        summary.runs += 1;

        let images_in = run.join(IMAGES_DIR);
        for record in read_ledger(&ledger_path)? {
            let source = images_in.join(&record.image_filename);
            if !source.is_file() {
                tracing::warn!("image {} not found, skipping", source.display());
                summary.missing_images += 1;
                continue;
            }

            let filename = combined_filename(summary.copied);
            let target = images_out.join(&filename);
            fs::copy(&source, &target).map_err(DatasetError::io(&target))?;
            ledger.append(&LedgerRecord {
                image_filename: filename,
                steering_angle: record.steering_angle,
            })?;
            summary.copied += 1;
        }
    }

    tracing::info!(
        "Consolidated {} images from {} runs into {}",
        summary.copied,
        summary.runs,
        out.display()
    );
    Ok(summary)
}
