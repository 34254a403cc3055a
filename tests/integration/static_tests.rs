//! Tests for the public static routes and the health check.

use std::fs;

use http::{header, StatusCode};

use super::test_utils::*;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new().await;

    let response = server.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_public_dir_fallback() {
    let server = TestServer::new().await;
    fs::write(server.public_dir.join("style.css"), "body { margin: 0 }").unwrap();

    let response = server.get("/style.css").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type, "text/css");
    assert_eq!(body_bytes(response).await, b"body { margin: 0 }");
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = TestServer::new().await;

    let response = server.get("/nope.html").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_upload_is_not_found() {
    let server = TestServer::new().await;

    let response = server.get("/uploads/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server.get("/qr/png/qr-missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_qr_image_content_type() {
    let server = TestServer::new().await;

    let uploaded = server.upload_ok("/upload", "a.txt", b"a").await;
    let response = server.get(&uploaded.qr_url).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
}

#[tokio::test]
async fn test_static_dirs_do_not_escape() {
    let server = TestServer::new().await;
    fs::write(server.public_dir.join("secret.txt"), "x").unwrap();

    let response = server.get("/uploads/../public/secret.txt").await;
    assert_ne!(response.status(), StatusCode::OK);
}
