//! QR code image generation.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   URL text   │──▶│  SVG vector  │──▶│  PNG raster  │──▶│ staged file  │
//! │              │   │ (margin 2,   │   │ (N×N px,     │   │ qr/png/      │
//! │              │   │  EC level)   │   │  level 9)    │   │ qr-<stem>.png│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Each step only starts after the previous one succeeded. An encode error
//! (text too long for the error correction level) stops the pipeline before
//! anything is written.
//!
//! # Components
//!
//! - [`render_svg`]: QR encoding and vector rendering
//! - [`PngRasterizer`]: SVG to fixed-size PNG
//! - [`QrPipeline`]: runs both on the blocking pool and stages the result
//! - [`QrMode`] / [`ColorScheme`]: color presets selected per request
//! - [`qr_filename`]: deterministic image name for an upload

mod pipeline;
mod raster;
mod svg;

pub use pipeline::{qr_filename, QrPipeline, StagedQrImage};
pub use raster::{PngRasterizer, DEFAULT_RASTER_SIZE, MAX_RASTER_SIZE};
pub use svg::{
    render_svg, svg_module_count, ColorScheme, ErrorCorrection, QrMode, Rgba, SvgOptions,
    DEFAULT_MARGIN,
};
