//! Per-run dataset directory: `images/frame_NNNNN.png` plus `labels.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use autopilot::{Recorder, Sample};
use image::ImageFormat;

use crate::error::DatasetError;
use crate::ledger::{LedgerRecord, LedgerWriter};

pub const IMAGES_DIR: &str = "images";
pub const LEDGER_FILE: &str = "labels.csv";

/// Image filename for the sample stored under `index`.
#[must_use]
pub fn frame_filename(index: u64) -> String {
    format!("frame_{index:05}.png")
}

/// Sink that persists samples as grayscale PNGs plus ledger rows.
///
/// The image is written before its ledger row, so an interrupted run can
/// leave an orphan image but never a row without its image.
pub struct DatasetWriter {
    root: PathBuf,
    images: PathBuf,
    ledger: LedgerWriter,
}

impl DatasetWriter {
    /// Prepares `root`, creating the image directory and starting a fresh
    /// ledger.
    ///
    /// # Errors
    ///
    /// Fails if the directories or the ledger cannot be created.
    pub fn create(root: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let root = root.as_ref().to_path_buf();
        let images = root.join(IMAGES_DIR);
        fs::create_dir_all(&images).map_err(DatasetError::io(&images))?;
        let ledger = LedgerWriter::create(root.join(LEDGER_FILE))?;
        tracing::info!("Writing dataset to {}", root.display());
        Ok(Self {
            root,
            images,
            ledger,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn ledger_path(&self) -> &Path {
        self.ledger.path()
    }

    #[must_use]
    pub fn samples_written(&self) -> u64 {
        self.ledger.rows()
    }
}

impl Recorder for DatasetWriter {
    type Error = DatasetError;

    fn record(&mut self, index: u64, sample: &Sample) -> Result<(), DatasetError> {
        let filename = frame_filename(index);
        let path = self.images.join(&filename);
        sample
            .frame
            .to_luma8()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| DatasetError::Image {
                path: path.clone(),
                source,
            })?;
        self.ledger.append(&LedgerRecord {
            image_filename: filename,
            steering_angle: sample.label,
        })
    }
}
