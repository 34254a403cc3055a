//! The code image pipeline: text → SVG → PNG → staged file.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::error::QrError;
use crate::storage::{StagedFile, StorageLayout};

use super::raster::{PngRasterizer, DEFAULT_RASTER_SIZE};
use super::svg::{render_svg, ErrorCorrection, QrMode, SvgOptions, DEFAULT_MARGIN};

/// Name of the QR image derived from a stored upload name.
///
/// The last extension is dropped, then `qr-` and `.png` are added. Uploads
/// whose names differ only in their extension share one image name, so the
/// later upload replaces the earlier image.
///
/// ```
/// use qr_drop::qr::qr_filename;
///
/// assert_eq!(qr_filename("photo.jpg"), "qr-photo.png");
/// assert_eq!(qr_filename("archive.tar.gz"), "qr-archive.tar.png");
/// assert_eq!(qr_filename("README"), "qr-README.png");
/// ```
pub fn qr_filename(stored_name: &str) -> String {
    let stem = match stored_name.rfind('.') {
        Some(idx) if idx > 0 => &stored_name[..idx],
        _ => stored_name,
    };
    format!("qr-{}.png", stem)
}

/// A QR image written to a temporary file, ready to be committed.
#[derive(Debug)]
pub struct StagedQrImage {
    /// File name inside the QR image directory
    pub filename: String,

    /// Public URL path, e.g. `/qr/png/qr-photo.png`
    pub public_path: String,

    pub file: StagedFile,
}

/// Renders QR images with fixed error correction, margin and size.
#[derive(Debug, Clone)]
pub struct QrPipeline {
    inner: Arc<PipelineSettings>,
}

#[derive(Debug)]
struct PipelineSettings {
    error_correction: ErrorCorrection,
    margin: u32,
    rasterizer: PngRasterizer,
}

impl Default for QrPipeline {
    fn default() -> Self {
        Self::new(ErrorCorrection::Low, DEFAULT_RASTER_SIZE)
    }
}

impl QrPipeline {
    pub fn new(error_correction: ErrorCorrection, size: u32) -> Self {
        Self {
            inner: Arc::new(PipelineSettings {
                error_correction,
                margin: DEFAULT_MARGIN,
                rasterizer: PngRasterizer::new(size),
            }),
        }
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.inner.error_correction
    }

    /// Edge length of generated images in pixels.
    pub fn size(&self) -> u32 {
        self.inner.rasterizer.size()
    }

    fn svg_options(&self, mode: QrMode) -> SvgOptions {
        SvgOptions {
            colors: mode.color_scheme(),
            margin: self.inner.margin,
            error_correction: self.inner.error_correction,
        }
    }

    /// Render `text` to PNG bytes on the current thread.
    pub fn render(&self, text: &str, mode: QrMode) -> Result<Bytes, QrError> {
        let svg = render_svg(text, &self.svg_options(mode))?;
        self.inner.rasterizer.rasterize(&svg)
    }

    /// Render `text` to PNG bytes on the blocking thread pool.
    pub async fn render_blocking(&self, text: String, mode: QrMode) -> Result<Bytes, QrError> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.render(&text, mode))
            .await
            .map_err(|e| QrError::TaskFailed(e.to_string()))?
    }

    /// Render the QR image for `url` and stage it under the name derived
    /// from `stored_name`.
    pub async fn stage(
        &self,
        layout: &StorageLayout,
        stored_name: &str,
        url: &str,
        mode: QrMode,
    ) -> Result<StagedQrImage, QrError> {
        let png = self.render_blocking(url.to_string(), mode).await?;
        let filename = qr_filename(stored_name);

        debug!(
            image = %filename,
            mode = mode.as_str(),
            bytes = png.len(),
            "Rendered QR image"
        );

        let file = StagedFile::stage(layout.qr_image_path(&filename), png).await?;
        let public_path = StorageLayout::qr_public_path(&filename);

        Ok(StagedQrImage {
            filename,
            public_path,
            file,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
