//! # QR Drop
//!
//! A small file drop: upload a file over HTTP, get back a link to it and a
//! scannable QR code image that encodes the link.
//!
//! ## Features
//!
//! - **Basic-auth upload area**: one configured username/password guards the form and the upload endpoint
//! - **QR rendering**: vector QR code rasterized to a fixed-size transparent PNG
//! - **Color modes**: black or white modules for light or dark backgrounds
//! - **Atomic writes**: files are staged and renamed into place only when the whole request succeeded
//! - **Static serving**: uploads and QR images are public
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`ingest`] - Multipart file intake and file name sanitizing
//! - [`qr`] - QR encoding, SVG rendering and PNG rasterization
//! - [`storage`] - Storage directories and staged writes
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use qr_drop::{create_router, AppState, QrPipeline, RouterConfig, StorageLayout};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let layout = StorageLayout::new("uploads", "qr");
//!     layout.init().await?;
//!
//!     let state = AppState::new(layout, QrPipeline::default());
//!     let router = create_router(state, RouterConfig::new("admin", "secret"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod qr;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{IngestError, QrError, StorageError, UploadError};
pub use ingest::{sanitize_filename, UploadedFile};
pub use qr::{qr_filename, ColorScheme, ErrorCorrection, PngRasterizer, QrMode, QrPipeline};
pub use server::{
    basic_auth_middleware, create_router, AppState, AuthError, BasicAuth, ErrorResponse,
    RequestOrigin, RouterConfig, UploadResponse,
};
pub use storage::{StagedFile, StorageLayout};
