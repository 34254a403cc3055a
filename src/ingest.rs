//! File ingest: receive one uploaded file and stage it in the upload directory.
//!
//! The stored name is the client's file name with every whitespace run
//! collapsed to a single underscore. No other characters are rewritten, but
//! names that could escape the upload directory, or that are too long to be
//! stored together with their QR image, are rejected.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::error::IngestError;
use crate::qr::qr_filename;
use crate::storage::{StagedFile, StorageLayout};

/// Multipart field that carries the file.
pub const FILE_FIELD: &str = "file";

/// Longest file name, in bytes, that common filesystems accept.
pub const MAX_NAME_BYTES: usize = 255;

/// Whitespace as matched by a JavaScript `\s`: the Unicode `White_Space`
/// characters except U+0085, plus the byte order mark U+FEFF.
fn is_name_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Replace every run of whitespace in `original` with a single `_`.
///
/// ```
/// use qr_drop::ingest::sanitize_filename;
///
/// assert_eq!(sanitize_filename("my  holiday\tphoto.jpg"), "my_holiday_photo.jpg");
/// assert_eq!(sanitize_filename("Ärger&Co (1).pdf"), "Ärger&Co_(1).pdf");
/// ```
pub fn sanitize_filename(original: &str) -> String {
    let mut sanitized = String::with_capacity(original.len());
    let mut in_whitespace = false;

    for c in original.chars() {
        if is_name_whitespace(c) {
            if !in_whitespace {
                sanitized.push('_');
                in_whitespace = true;
            }
        } else {
            sanitized.push(c);
            in_whitespace = false;
        }
    }

    sanitized
}

/// Reject names that are not a single, plain path component, or that
/// (or whose QR image name) exceed [`MAX_NAME_BYTES`].
pub fn validate_stored_name(name: &str) -> Result<(), IngestError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name refers to a directory")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else if name.len() > MAX_NAME_BYTES {
        Some("name is too long")
    } else if qr_filename(name).len() > MAX_NAME_BYTES {
        Some("name is too long for its QR image name")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(IngestError::InvalidFilename {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// A file received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client
    pub original_name: String,

    /// Name used on disk and in URLs
    pub stored_name: String,

    /// File contents
    pub data: Bytes,
}

impl UploadedFile {
    /// Sanitize and validate the client's file name.
    pub fn new(original_name: impl Into<String>, data: Bytes) -> Result<Self, IngestError> {
        let original_name = original_name.into();
        let stored_name = sanitize_filename(&original_name);
        validate_stored_name(&stored_name)?;

        Ok(Self {
            original_name,
            stored_name,
            data,
        })
    }

    /// Read the `file` field from a multipart body.
    ///
    /// Fields with other names are skipped. A `file` field without a file
    /// name (a plain form value, or an empty file input) does not count as a
    /// file.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, IngestError> {
        let mut found: Option<(String, Bytes)> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| IngestError::Multipart(e.to_string()))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let file_name = match field.file_name() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };
            if found.is_some() {
                return Err(IngestError::Multipart(
                    "multiple file fields; send exactly one field named 'file'".to_string(),
                ));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| IngestError::Multipart(e.to_string()))?;
            found = Some((file_name, data));
        }

        let (file_name, data) = found.ok_or(IngestError::MissingFile)?;
        debug!(file_name = %file_name, bytes = data.len(), "Received upload");
        Self::new(file_name, data)
    }

    /// Write the contents to a temporary file in the upload directory.
    pub async fn stage(&self, layout: &StorageLayout) -> Result<StagedFile, IngestError> {
        let target = layout.upload_path(&self.stored_name);
        Ok(StagedFile::stage(target, self.data.clone()).await?)
    }
}

// =============================================================================
// Tests
// =============================================================================
