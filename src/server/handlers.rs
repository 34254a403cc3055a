//! HTTP request handlers for the upload service.
//!
//! # Endpoints
//!
//! - `GET /` - Upload form (protected)
//! - `POST /upload?mode={black|white}` - Store a file and create its QR image (protected)
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{IngestError, QrError, StorageError, UploadError};
use crate::ingest::UploadedFile;
use crate::qr::{QrMode, QrPipeline};
use crate::storage::StorageLayout;

use super::form::UPLOAD_FORM_HTML;
use super::origin::RequestOrigin;

/// Status message returned with every successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload and QR code created";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Where uploads and QR images are written
    pub layout: Arc<StorageLayout>,

    /// QR image renderer
    pub pipeline: QrPipeline,
}

impl AppState {
    pub fn new(layout: StorageLayout, pipeline: QrPipeline) -> Self {
        Self {
            layout: Arc::new(layout),
            pipeline,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for upload requests.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQueryParams {
    /// Color mode, `black` (default) or `white`
    #[serde(default)]
    pub mode: Option<String>,
}

impl UploadQueryParams {
    pub fn qr_mode(&self) -> QrMode {
        QrMode::from_param(self.mode.as_deref())
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions except a missing file.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_filename", "storage_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Human-readable status
    pub message: String,

    /// Absolute URL of the stored file
    pub image_url: String,

    /// Path of the generated QR image, e.g. `/qr/png/qr-photo.png`
    pub qr_url: String,
}

impl UploadResponse {
    pub fn new(image_url: impl Into<String>, qr_url: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            image_url: image_url.into(),
            qr_url: qr_url.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Message sent to clients for storage failures; the server paths stay in the log.
pub const STORAGE_ERROR_MESSAGE: &str = "Failed to store the uploaded file";

fn storage_error_parts(err: &StorageError) -> (StatusCode, &'static str, String) {
    error!(error = %err, "Storage failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "storage_error",
        STORAGE_ERROR_MESSAGE.to_string(),
    )
}

/// Convert UploadError to HTTP response.
///
/// A missing file answers with a plain-text 400. Everything else is a JSON
/// [`ErrorResponse`]; 5xx errors are logged at ERROR level, 4xx at WARN.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            UploadError::Ingest(IngestError::MissingFile) => {
                debug!(status = 400, "Upload without file");
                return (StatusCode::BAD_REQUEST, self.to_string()).into_response();
            }

            UploadError::Ingest(IngestError::Multipart(msg)) => (
                StatusCode::BAD_REQUEST,
                "invalid_multipart",
                format!("Failed to read multipart body: {}", msg),
            ),

            UploadError::Ingest(err @ IngestError::InvalidFilename { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_filename", err.to_string())
            }

            UploadError::MissingHost => (StatusCode::BAD_REQUEST, "missing_host", self.to_string()),

            UploadError::Qr(QrError::Encode(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "qr_capacity_exceeded",
                format!("File URL does not fit into a QR code: {}", msg),
            ),

            UploadError::Ingest(IngestError::Storage(err)) | UploadError::Qr(QrError::Storage(err)) => {
                storage_error_parts(err)
            }

            UploadError::Qr(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "render_error",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Serve the upload form.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> Html<&'static str> {
    Html(UPLOAD_FORM_HTML)
}

/// Handle file uploads.
///
/// # Endpoint
///
/// `POST /upload?mode={black|white}`
///
/// # Request
///
/// `multipart/form-data` with the file in a field named `file`.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "message": "Upload and QR code created",
///   "imageUrl": "http://localhost:3000/uploads/photo.jpg",
///   "qrUrl": "/qr/png/qr-photo.png"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: No file (plain text), invalid file name, missing host
/// - `401 Unauthorized`: Missing or wrong credentials
/// - `422 Unprocessable Entity`: File URL too long for a QR code
/// - `500 Internal Server Error`: Rendering or storage failure
///
/// Both files are staged first and only moved to their public names once
/// everything succeeded, so a failed request leaves no new files behind.
pub async fn upload_handler(
    State(state): State<AppState>,
    origin: RequestOrigin,
    Query(query): Query<UploadQueryParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let multipart = multipart.map_err(|rejection| {
        debug!(reason = %rejection, "Request body is not multipart");
        IngestError::MissingFile
    })?;

    let file = UploadedFile::from_multipart(multipart).await?;
    let mode = query.qr_mode();

    let staged_upload = file.stage(&state.layout).await?;
    let image_url = origin.file_url(&file.stored_name);

    let staged_qr = state
        .pipeline
        .stage(&state.layout, &file.stored_name, &image_url, mode)
        .await?;

    staged_upload.commit()?;
    staged_qr.file.commit()?;

    info!(
        file = %file.stored_name,
        bytes = file.data.len(),
        qr_image = %staged_qr.filename,
        mode = mode.as_str(),
        "Stored upload"
    );

    Ok(Json(UploadResponse::new(image_url, staged_qr.public_path)))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
