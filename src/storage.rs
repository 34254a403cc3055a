//! Filesystem storage for uploaded files and generated QR images.
//!
//! Two directories are used:
//!
//! ```text
//! <upload_dir>/<stored-name>          originals, served at /uploads/
//! <qr_root>/png/qr-<basename>.png     QR images, served at /qr/
//! ```
//!
//! Both are created by [`StorageLayout::init`], which the process entry point
//! calls once before serving.
//!
//! Writes go through [`StagedFile`]: bytes land in a hidden temporary file
//! inside the target directory and are renamed into place by
//! [`StagedFile::commit`]. Dropping an uncommitted `StagedFile` removes the
//! temporary file, so a failed or cancelled request never leaves a partial
//! file under a public name.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::TempPath;
use tracing::debug;

use crate::error::StorageError;

/// Subdirectory of the QR root holding the PNG images.
pub const QR_IMAGE_SUBDIR: &str = "png";

/// URL prefix under which uploaded files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// URL prefix under which the QR root is served.
pub const QR_URL_PREFIX: &str = "/qr";

// =============================================================================
// Storage Layout
// =============================================================================

/// Locations of the storage directories.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    upload_dir: PathBuf,
    qr_root: PathBuf,
}

impl StorageLayout {
    /// Create a layout from the upload directory and the QR root directory.
    ///
    /// Nothing is touched on disk until [`init`](Self::init) is called.
    pub fn new(upload_dir: impl Into<PathBuf>, qr_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            qr_root: qr_root.into(),
        }
    }

    /// Create both directories (recursively) if they are absent.
    pub async fn init(&self) -> Result<(), StorageError> {
        for dir in [self.upload_dir.clone(), self.qr_image_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| StorageError::io(&dir, e))?;
            debug!(dir = %dir.display(), "Storage directory ready");
        }
        Ok(())
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn qr_root(&self) -> &Path {
        &self.qr_root
    }

    /// Directory that holds the generated PNG images.
    pub fn qr_image_dir(&self) -> PathBuf {
        self.qr_root.join(QR_IMAGE_SUBDIR)
    }

    pub fn upload_path(&self, stored_name: &str) -> PathBuf {
        self.upload_dir.join(stored_name)
    }

    pub fn qr_image_path(&self, image_name: &str) -> PathBuf {
        self.qr_image_dir().join(image_name)
    }

    /// Public URL path of a QR image, e.g. `/qr/png/qr-photo.png`.
    pub fn qr_public_path(image_name: &str) -> String {
        format!("{}/{}/{}", QR_URL_PREFIX, QR_IMAGE_SUBDIR, image_name)
    }
}

// =============================================================================
// Staged Writes
// =============================================================================

/// File contents written to a temporary path, waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedFile {
    temp: TempPath,
    target: PathBuf,
}

impl StagedFile {
    /// Write `data` to a temporary file next to `target`.
    ///
    /// The write and fsync run on the blocking pool. If the calling future is
    /// dropped before this returns, the temporary file is still cleaned up.
    pub async fn stage(target: PathBuf, data: Bytes) -> Result<Self, StorageError> {
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let temp = tokio::task::spawn_blocking(move || write_temp(&dir, &data))
            .await
            .map_err(|e| StorageError::io(&target, e))??;

        Ok(Self { temp, target })
    }

    /// Final path this file will have once committed.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of the temporary file holding the staged bytes.
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Atomically rename the staged file to its target, replacing any
    /// existing file of the same name.
    pub fn commit(self) -> Result<PathBuf, StorageError> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|e| StorageError::Persist {
                path: target.display().to_string(),
                message: e.error.to_string(),
            })?;
        Ok(target)
    }
}

fn write_temp(dir: &Path, data: &[u8]) -> Result<TempPath, StorageError> {
    let mut file = tempfile::Builder::new()
        .prefix(".staging-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| StorageError::io(dir, e))?;

    file.write_all(data)
        .map_err(|e| StorageError::io(file.path(), e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(file.path(), e))?;

    Ok(file.into_temp_path())
}

// =============================================================================
// Tests
// =============================================================================
