//! Router configuration for the upload service.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Upload form (Basic auth)
//! /upload            - File upload, POST (Basic auth)
//! /health            - Health check (public)
//! /uploads/{name}    - Uploaded files (public)
//! /qr/png/{name}     - QR images (public)
//! /{anything else}   - Public directory (public)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use qr_drop::qr::QrPipeline;
//! use qr_drop::server::{create_router, AppState, RouterConfig};
//! use qr_drop::storage::StorageLayout;
//!
//! let layout = StorageLayout::new("uploads", "qr");
//! layout.init().await?;
//!
//! let state = AppState::new(layout, QrPipeline::default());
//! let router = create_router(state, RouterConfig::new("alice", "s3cret"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, StatusCode};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::auth::{basic_auth_middleware, BasicAuth};
use super::handlers::{health_handler, index_handler, upload_handler, AppState};
use crate::storage::{QR_URL_PREFIX, UPLOADS_URL_PREFIX};

/// Default maximum upload body size (100 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Default upload request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Accepted Basic auth username
    pub auth_username: String,

    /// Accepted Basic auth password
    pub auth_password: String,

    /// Directory served for paths no other route handles (None = no fallback)
    pub public_dir: Option<PathBuf>,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum upload request body size in bytes
    pub max_upload_size: usize,

    /// Time limit for a complete upload request
    pub request_timeout: Duration,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with the given credentials.
    ///
    /// By default:
    /// - No public directory
    /// - CORS allows any origin
    /// - Uploads up to 100 MiB, 60 second timeout
    /// - Tracing is enabled
    pub fn new(auth_username: impl Into<String>, auth_password: impl Into<String>) -> Self {
        Self {
            auth_username: auth_username.into(),
            auth_password: auth_password.into(),
            public_dir: None,
            cors_origins: None,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            enable_tracing: true,
        }
    }

    /// Serve static files from `dir` for unmatched paths.
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(dir.into());
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Protected routes (upload form and upload endpoint, Basic auth)
/// - Public routes (health check, static files)
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let auth = BasicAuth::new(&config.auth_username, &config.auth_password);
    let cors = build_cors_layer(&config);

    let upload_routes = Router::new()
        .route("/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

    // Auth is a route layer so it never runs for the static fallbacks
    let protected_routes = Router::new()
        .route("/", get(index_handler))
        .merge(upload_routes)
        .route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware))
        .with_state(state.clone());

    let mut router = Router::new()
        .merge(protected_routes)
        .route("/health", get(health_handler))
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.layout.upload_dir()))
        .nest_service(QR_URL_PREFIX, ServeDir::new(state.layout.qr_root()));

    if let Some(ref public_dir) = config.public_dir {
        router = router.fallback_service(ServeDir::new(public_dir));
    }

    let router = router.layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
