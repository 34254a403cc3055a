use thiserror::Error;

/// Errors raised while writing files into the storage directories
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// Creating, writing or syncing a file or directory failed
    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Moving a staged file into its final place failed
    #[error("Failed to persist {path}: {message}")]
    Persist { path: String, message: String },
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors that can occur while receiving an uploaded file
#[derive(Debug, Clone, Error)]
pub enum IngestError {
    /// The request carried no `file` field
    #[error("No file uploaded.")]
    MissingFile,

    /// The multipart body could not be read
    #[error("Failed to read multipart body: {0}")]
    Multipart(String),

    /// The file name cannot be used as a storage path component
    #[error("Invalid file name {name:?}: {reason}")]
    InvalidFilename { name: String, reason: &'static str },

    /// Staging the file on disk failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the code image pipeline
#[derive(Debug, Clone, Error)]
pub enum QrError {
    /// Text does not fit into a QR code at the configured error correction level
    #[error("Cannot encode QR code: {0}")]
    Encode(String),

    /// The generated SVG document could not be parsed
    #[error("Invalid SVG: {0}")]
    Svg(String),

    /// Rendering the SVG to pixels failed
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Png(String),

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {0}")]
    TaskFailed(String),

    /// Staging the image on disk failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the upload endpoint
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Qr(#[from] QrError),

    /// Neither a Host header nor a URI authority was present
    #[error("Cannot derive file URL: request has no host")]
    MissingHost,
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        UploadError::Ingest(IngestError::Storage(err))
    }
}
