//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /upload ──▶ auth ──▶ ingest ──▶ qr ──▶ commit       │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────┐  │
//! │  │  handlers   │  │    auth     │  │   origin    │  │ routes │  │
//! │  │ (requests)  │  │ (Basic)     │  │ (file URLs) │  │        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod form;
pub mod handlers;
pub mod origin;
pub mod routes;

pub use auth::{basic_auth_middleware, AuthError, BasicAuth, Credentials};
pub use handlers::{
    health_handler, index_handler, upload_handler, AppState, ErrorResponse, HealthResponse,
    UploadQueryParams, UploadResponse,
};
pub use origin::RequestOrigin;
pub use routes::{create_router, RouterConfig};
