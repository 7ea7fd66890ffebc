//! # Dataset
//!
//! Persistence for generated samples.
//!
//! ## Key Components
//!
//! -   **[`DatasetWriter`]:** A [`autopilot::Recorder`] that stores each
//!     sample as an 8-bit grayscale PNG under `images/` and appends its label
//!     to `labels.csv`.
//! -   **[`LedgerWriter`] / [`read_ledger`]:** The `image_filename,steering_angle`
//!     CSV ledger.
//! -   **[`consolidate`]:** Merges `run_*` directories into `all_images/` and
//!     `combined_labels.csv` with one global numbering.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod consolidate;
pub mod error;
pub mod ledger;
pub mod writer;

pub use consolidate::{
    combined_filename, consolidate, find_runs, ConsolidationSummary, COMBINED_IMAGES_DIR,
    COMBINED_LEDGER_FILE, RUN_PREFIX,
};
pub use error::DatasetError;
pub use ledger::{read_ledger, LedgerRecord, LedgerWriter, LEDGER_HEADER};
pub use writer::{frame_filename, DatasetWriter, IMAGES_DIR, LEDGER_FILE};
