// SPDX-License-Identifier: GPL-3.0-only

//! Storage for captured snapshots
//!
//! Photos are written as `<unix seconds>.jpg` into one flat directory. The
//! returned path is what the history keeps for printing; nothing else is
//! persisted.

use crate::constants::SNAPSHOT_EXTENSION;
use crate::errors::{AppError, AppResult, PhotoError};
use crate::pipelines::photo::encode_jpeg;
use chrono::{DateTime, Utc};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where captured photos go
pub trait SnapshotStore {
    /// Persist `image` and return the path it was written to
    fn save(&mut self, image: &RgbImage) -> Result<PathBuf, PhotoError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn save(&mut self, image: &RgbImage) -> Result<PathBuf, PhotoError> {
        (**self).save(image)
    }
}

/// Writes JPEG snapshots named by capture time into a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    jpeg_quality: u8,
}

impl DirectoryStore {
    /// Use `dir`, creating it if necessary
    pub fn open(dir: impl Into<PathBuf>, jpeg_quality: u8) -> AppResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("cannot create {}: {}", dir.display(), e))
        })?;
        info!(path = %dir.display(), "Snapshot directory ready");
        Ok(Self { dir, jpeg_quality })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free `<secs>.jpg`, `<secs>-1.jpg`, ... for `taken_at`
    pub fn path_for(&self, taken_at: DateTime<Utc>) -> PathBuf {
        let stem = taken_at.timestamp().to_string();
        let mut path = self.dir.join(format!("{}.{}", stem, SNAPSHOT_EXTENSION));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}-{}.{}", stem, n, SNAPSHOT_EXTENSION));
            n += 1;
        }
        path
    }

    /// Encode and write `image` as if captured at `taken_at`
    pub fn save_at(&self, image: &RgbImage, taken_at: DateTime<Utc>) -> Result<PathBuf, PhotoError> {
        let encoded = encode_jpeg(image, self.jpeg_quality)?;
        let path = self.path_for(taken_at);
        std::fs::write(&path, &encoded.data)?;
        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            "Snapshot saved"
        );
        Ok(path)
    }
}

impl SnapshotStore for DirectoryStore {
    fn save(&mut self, image: &RgbImage) -> Result<PathBuf, PhotoError> {
        self.save_at(image, Utc::now())
    }
}
