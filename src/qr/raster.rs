//! SVG to PNG rasterization.
//!
//! The SVG is scaled to fill a square pixmap, rendered with resvg, and
//! encoded as RGBA PNG at the highest compression level. Transparent areas
//! of the SVG stay transparent in the PNG.

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use crate::error::QrError;

/// Default output edge length in pixels.
pub const DEFAULT_RASTER_SIZE: u32 = 2046;

/// Largest accepted output edge length in pixels.
pub const MAX_RASTER_SIZE: u32 = 8192;

// =============================================================================
// PNG Rasterizer
// =============================================================================

/// Renders SVG documents into square PNG images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngRasterizer {
    size: u32,
}

impl Default for PngRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RASTER_SIZE)
    }
}

impl PngRasterizer {
    /// Create a rasterizer producing `size`×`size` images.
    ///
    /// The size is clamped to `1..=MAX_RASTER_SIZE`.
    pub fn new(size: u32) -> Self {
        Self {
            size: size.clamp(1, MAX_RASTER_SIZE),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Render `svg` and encode it as PNG.
    pub fn rasterize(&self, svg: &str) -> Result<Bytes, QrError> {
        let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
            .map_err(|e| QrError::Svg(e.to_string()))?;

        let mut pixmap = Pixmap::new(self.size, self.size).ok_or_else(|| {
            QrError::Raster(format!("cannot allocate {0}x{0} pixmap", self.size))
        })?;

        let tree_size = tree.size();
        let transform = Transform::from_scale(
            self.size as f32 / tree_size.width(),
            self.size as f32 / tree_size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        encode_png(&pixmap)
    }
}

/// Encode a pixmap as straight-alpha RGBA PNG with maximum compression.
fn encode_png(pixmap: &Pixmap) -> Result<Bytes, QrError> {
    // tiny-skia stores premultiplied alpha, PNG expects straight alpha
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut output, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            &rgba,
            pixmap.width(),
            pixmap.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| QrError::Png(e.to_string()))?;

    Ok(Bytes::from(output))
}

// =============================================================================
// Tests
// =============================================================================
