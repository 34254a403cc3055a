//! Absolute URLs for stored files, derived from the incoming request.
//!
//! The scheme comes from `X-Forwarded-Proto` when a TLS-terminating proxy
//! sets it, otherwise from the request URI, otherwise `http`. The host comes
//! from the `Host` header, or the URI authority for HTTP/2 requests. The host
//! is taken as sent by the client.

use axum::{extract::FromRequestParts, http::request::Parts};
use http::header::HOST;

use crate::error::UploadError;
use crate::storage::UPLOADS_URL_PREFIX;

/// Header set by reverse proxies to announce the client-facing scheme.
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Scheme and host the client used to reach this server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// Derive the origin from request parts.
    pub fn from_parts(parts: &Parts) -> Result<Self, UploadError> {
        let forwarded = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let scheme = forwarded
            .or_else(|| parts.uri.scheme_str())
            .unwrap_or("http")
            .to_ascii_lowercase();

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .ok_or(UploadError::MissingHost)?;

        Ok(Self { scheme, host })
    }

    /// Absolute URL of an uploaded file:
    /// `<scheme>://<host>/uploads/<stored-name>`.
    ///
    /// The name is percent-encoded as a single path segment, so names made of
    /// unreserved characters appear unchanged.
    pub fn file_url(&self, stored_name: &str) -> String {
        format!(
            "{}://{}{}/{}",
            self.scheme,
            self.host,
            UPLOADS_URL_PREFIX,
            urlencoding::encode(stored_name)
        )
    }
}

impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = UploadError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}

// =============================================================================
// Tests
// =============================================================================
