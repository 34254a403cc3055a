//! Configuration management for QR Drop.
//!
//! Settings come from command-line arguments via clap, with every option
//! also readable from an environment variable. `main` loads a `.env` file
//! from the working directory first, if one exists.
//!
//! # Environment Variables
//!
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `AUTH_USER` - Username for the upload area (required)
//! - `AUTH_PASS` - Password for the upload area (required)
//! - `UPLOAD_DIR` - Directory for uploaded files (default: uploads)
//! - `QR_DIR` - Root directory for QR images, PNGs go to `<QR_DIR>/png` (default: qr)
//! - `PUBLIC_DIR` - Directory with extra static assets (default: public)
//! - `QR_EC_LEVEL` - QR error correction level L, M, Q or H (default: L)
//! - `QR_SIZE` - QR image edge length in pixels (default: 2046)
//! - `MAX_UPLOAD_SIZE` - Maximum upload request size in bytes (default: 100 MiB)
//! - `REQUEST_TIMEOUT` - Upload request timeout in seconds (default: 60)
//! - `CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::time::Duration;

use clap::Parser;

use crate::qr::{ErrorCorrection, DEFAULT_RASTER_SIZE, MAX_RASTER_SIZE};
use crate::server::routes::{DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory for uploaded files.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default root directory for QR images.
pub const DEFAULT_QR_DIR: &str = "qr";

/// Default directory for extra static assets.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

// =============================================================================
// CLI Arguments
// =============================================================================

/// QR Drop - upload a file, get a QR code that links to it.
#[derive(Parser, Debug, Clone)]
#[command(name = "qr-drop")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Username required for the upload form and the upload endpoint.
    #[arg(long, env = "AUTH_USER")]
    pub auth_user: String,

    /// Password required for the upload form and the upload endpoint.
    #[arg(long, env = "AUTH_PASS", hide_env_values = true)]
    pub auth_pass: String,

    // =========================================================================
    // Storage Configuration
    // =========================================================================
    /// Directory where uploaded files are stored.
    #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "UPLOAD_DIR")]
    pub upload_dir: String,

    /// Root directory for QR images (images are written to `<qr-dir>/png`).
    #[arg(long, default_value = DEFAULT_QR_DIR, env = "QR_DIR")]
    pub qr_dir: String,

    /// Directory with extra static assets served as-is.
    #[arg(long, default_value = DEFAULT_PUBLIC_DIR, env = "PUBLIC_DIR")]
    pub public_dir: String,

    // =========================================================================
    // QR Configuration
    // =========================================================================
    /// QR error correction level: L, M, Q or H.
    #[arg(long, default_value_t = ErrorCorrection::Low, env = "QR_EC_LEVEL")]
    pub qr_ec_level: ErrorCorrection,

    /// Edge length of generated QR images in pixels.
    #[arg(long, default_value_t = DEFAULT_RASTER_SIZE, env = "QR_SIZE")]
    pub qr_size: u32,

    // =========================================================================
    // Request Limits
    // =========================================================================
    /// Maximum upload request size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE, env = "MAX_UPLOAD_SIZE")]
    pub max_upload_size: usize,

    /// Upload request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, env = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_user.is_empty() {
            return Err("Username is required. Set --auth-user or AUTH_USER".to_string());
        }
        // Basic auth splits user and password at the first colon
        if self.auth_user.contains(':') {
            return Err("Username must not contain ':'".to_string());
        }
        if self.auth_pass.is_empty() {
            return Err("Password is required. Set --auth-pass or AUTH_PASS".to_string());
        }

        if self.qr_size == 0 || self.qr_size > MAX_RASTER_SIZE {
            return Err(format!("qr_size must be between 1 and {}", MAX_RASTER_SIZE));
        }

        if self.max_upload_size == 0 {
            return Err("max_upload_size must be greater than 0".to_string());
        }
        if self.request_timeout == 0 {
            return Err("request_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

// =============================================================================
// Tests
// =============================================================================
