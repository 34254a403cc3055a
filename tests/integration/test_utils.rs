//! Test utilities for integration tests.
//!
//! Helpers for building a router over temporary storage directories,
//! hand-written multipart bodies, and decoding QR images.

use std::fs;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::Router;
use base64::Engine;
use http::{header, Request, Response};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use qr_drop::{
    create_router, AppState, ErrorCorrection, QrMode, QrPipeline, RouterConfig, StorageLayout,
    UploadResponse,
};

pub const TEST_USER: &str = "alice";
pub const TEST_PASS: &str = "s3cret";
pub const TEST_HOST: &str = "localhost:3000";

/// Small edge length keeps PNG encoding fast in debug builds.
pub const SMALL_QR_SIZE: u32 = 300;

const BOUNDARY: &str = "----qrdroptestboundary7MA4YWxkTrZu0gW";

// =============================================================================
// Test Server
// =============================================================================

/// A router backed by fresh temporary directories.
pub struct TestServer {
    pub router: Router,
    pub layout: StorageLayout,
    pub public_dir: PathBuf,
    _root: TempDir,
}

impl TestServer {
    /// Router with a small QR size and default settings otherwise.
    pub async fn new() -> Self {
        Self::with_pipeline(QrPipeline::new(ErrorCorrection::Low, SMALL_QR_SIZE)).await
    }

    pub async fn with_pipeline(pipeline: QrPipeline) -> Self {
        Self::build(pipeline, |config| config).await
    }

    /// Full control over the router configuration.
    pub async fn build(
        pipeline: QrPipeline,
        configure: impl FnOnce(RouterConfig) -> RouterConfig,
    ) -> Self {
        let root = TempDir::new().unwrap();
        let layout = StorageLayout::new(root.path().join("uploads"), root.path().join("qr"));
        layout.init().await.unwrap();

        let public_dir = root.path().join("public");
        fs::create_dir_all(&public_dir).unwrap();

        let config = configure(
            RouterConfig::new(TEST_USER, TEST_PASS)
                .with_public_dir(&public_dir)
                .with_tracing(false),
        );
        let router = create_router(AppState::new(layout.clone(), pipeline), config);

        Self {
            router,
            layout,
            public_dir,
            _root: root,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Authenticated upload of a single file.
    pub async fn upload(&self, filename: &str, data: &[u8]) -> Response<Body> {
        self.send(upload_request("/upload", filename, data)).await
    }

    /// Authenticated upload that must succeed.
    pub async fn upload_ok(&self, uri: &str, filename: &str, data: &[u8]) -> UploadResponse {
        let response = self.send(upload_request(uri, filename, data)).await;
        assert_eq!(response.status(), 200, "upload of {:?} failed", filename);
        let body = body_bytes(response).await;
        serde_json::from_slice(&body).unwrap()
    }

    /// GET a path without credentials.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Names of the files in the upload directory, sorted.
    pub fn uploaded_files(&self) -> Vec<String> {
        list_dir(self.layout.upload_dir())
    }

    /// Names of the files in the QR image directory, sorted.
    pub fn qr_files(&self) -> Vec<String> {
        list_dir(&self.layout.qr_image_dir())
    }
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Request Builders
// =============================================================================

pub fn basic_auth_header(user: &str, pass: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, pass));
    format!("Basic {}", encoded)
}

/// Multipart body with one part per `(field, filename, data)` entry.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        field, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n", field).as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Authenticated multipart POST with explicit parts.
pub fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, TEST_HOST)
        .header(header::AUTHORIZATION, basic_auth_header(TEST_USER, TEST_PASS))
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Authenticated multipart POST carrying one file in the `file` field.
pub fn upload_request(uri: &str, filename: &str, data: &[u8]) -> Request<Body> {
    multipart_request(uri, &[("file", Some(filename), data)])
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Path and query of an absolute URL, e.g. `/uploads/a.png`.
pub fn url_path(url: &str) -> &str {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap();
    let slash = after_scheme.find('/').unwrap();
    &after_scheme[slash..]
}

// =============================================================================
// QR Decoding
// =============================================================================

/// Decode the QR code in a transparent PNG.
///
/// Transparent pixels count as light. For white mode the opaque modules are
/// light, so the image is inverted before detection.
pub fn decode_qr(png: &[u8], mode: QrMode) -> String {
    let image = image::load_from_memory(png).unwrap().to_rgba8();
    let (width, height) = image.dimensions();

    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
            let pixel = image.get_pixel(x as u32, y as u32);
            let opaque = pixel[3] >= 128;
            let dark = match mode {
                QrMode::Black => opaque && pixel[0] < 128,
                QrMode::White => opaque && pixel[0] >= 128,
            };
            if dark {
                0
            } else {
                255
            }
        });

    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_meta, content) = grids[0].decode().unwrap();
    content
}
