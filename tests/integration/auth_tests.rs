//! Basic authentication tests for the protected routes.

use axum::body::Body;
use http::{header, Request, StatusCode};

use super::test_utils::*;

fn assert_challenge(response: &http::Response<Body>) {
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .expect("401 must carry a challenge")
        .to_str()
        .unwrap();
    assert!(challenge.starts_with("Basic"));
    assert!(challenge.contains("Upload Area"));
}

#[tokio::test]
async fn test_form_requires_auth() {
    let server = TestServer::new().await;

    let response = server.get("/").await;

    assert_challenge(&response);
    assert_eq!(body_bytes(response).await, b"Authentication required.");
}

#[tokio::test]
async fn test_form_with_valid_credentials() {
    let server = TestServer::new().await;

    let request = Request::builder()
        .uri("/")
        .header(header::AUTHORIZATION, basic_auth_header(TEST_USER, TEST_PASS))
        .body(Body::empty())
        .unwrap();
    let response = server.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("<form"));
    assert!(body.contains("/upload"));
}

#[tokio::test]
async fn test_upload_without_credentials() {
    let server = TestServer::new().await;

    let mut request = upload_request("/upload", "a.txt", b"a");
    request.headers_mut().remove(header::AUTHORIZATION);
    let response = server.send(request).await;

    assert_challenge(&response);
    assert!(server.uploaded_files().is_empty());
    assert!(server.qr_files().is_empty());
}

#[tokio::test]
async fn test_upload_with_wrong_password() {
    let server = TestServer::new().await;

    let mut request = upload_request("/upload", "a.txt", b"a");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        basic_auth_header(TEST_USER, "wrong").parse().unwrap(),
    );
    let response = server.send(request).await;

    assert_challenge(&response);
    assert!(server.uploaded_files().is_empty());
}

#[tokio::test]
async fn test_upload_with_wrong_user() {
    let server = TestServer::new().await;

    let mut request = upload_request("/upload", "a.txt", b"a");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        basic_auth_header("mallory", TEST_PASS).parse().unwrap(),
    );
    let response = server.send(request).await;

    assert_challenge(&response);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let server = TestServer::new().await;

    for value in ["Bearer abc", "Basic !!!", "Basic bm9jb2xvbg=="] {
        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let response = server.send(request).await;
        assert_challenge(&response);
    }
}

#[tokio::test]
async fn test_public_routes_need_no_credentials() {
    let server = TestServer::new().await;

    let uploaded = server.upload_ok("/upload", "a.txt", b"hello").await;

    let response = server.get(url_path(&uploaded.image_url)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get(&uploaded.qr_url).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
