//! HTTP Basic authentication for the upload area.
//!
//! Exactly one username/password pair is accepted. Both are compared in
//! constant time.
//!
//! # Example
//!
//! ```rust
//! use qr_drop::server::auth::BasicAuth;
//!
//! let auth = BasicAuth::new("alice", "s3cret");
//!
//! // "alice:s3cret" in base64
//! assert!(auth.verify_header("Basic YWxpY2U6czNjcmV0").is_ok());
//! assert!(auth.verify_header("Basic YWxpY2U6d3Jvbmc=").is_err());
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Realm announced in the `WWW-Authenticate` challenge.
pub const AUTH_REALM: &str = "Upload Area";

// =============================================================================
// Types
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header, or a scheme other than Basic
    MissingCredentials,

    /// Basic credentials that are not valid base64 `user:pass`
    MalformedCredentials,

    /// Username or password do not match
    InvalidCredentials,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Missing credentials"),
            AuthError::MalformedCredentials => write!(f, "Malformed credentials"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Wrong credentials may be a guessing attempt; missing ones are the
        // normal first request of every browser session
        match &self {
            AuthError::InvalidCredentials => {
                warn!(status = 401, "Authentication failed: {}", self)
            }
            _ => debug!(status = 401, "Authentication failed: {}", self),
        }

        let challenge = format!("Basic realm=\"{}\"", AUTH_REALM);
        let mut response = (StatusCode::UNAUTHORIZED, "Authentication required.").into_response();
        if let Ok(value) = HeaderValue::from_str(&challenge) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

// =============================================================================
// Basic Authentication
// =============================================================================

/// Credentials parsed from an `Authorization: Basic ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse an Authorization header value.
    ///
    /// The scheme is matched case-insensitively. The password is everything
    /// after the first `:`, so it may itself contain colons.
    pub fn from_header(value: &str) -> Result<Self, AuthError> {
        let (scheme, encoded) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MissingCredentials)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::MissingCredentials);
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Encode as an Authorization header value.
    pub fn to_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

/// The single accepted username/password pair.
#[derive(Clone)]
pub struct BasicAuth {
    username: Vec<u8>,
    password: Vec<u8>,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &String::from_utf8_lossy(&self.username))
            .field("password", &"<redacted>")
            .finish()
    }
}

impl BasicAuth {
    pub fn new(username: impl AsRef<[u8]>, password: impl AsRef<[u8]>) -> Self {
        Self {
            username: username.as_ref().to_vec(),
            password: password.as_ref().to_vec(),
        }
    }

    /// Check parsed credentials against the configured pair.
    pub fn verify(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let user_ok = credentials.username.as_bytes().ct_eq(&self.username);
        let pass_ok = credentials.password.as_bytes().ct_eq(&self.password);

        if (user_ok & pass_ok).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Parse and check an Authorization header value.
    pub fn verify_header(&self, value: &str) -> Result<(), AuthError> {
        let credentials = Credentials::from_header(value)?;
        self.verify(&credentials)
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware that rejects requests without the configured credentials.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::get};
/// use qr_drop::server::auth::{BasicAuth, basic_auth_middleware};
///
/// let auth = BasicAuth::new("alice", "s3cret");
/// let app = Router::new()
///     .route("/", get(index_handler))
///     .route_layer(middleware::from_fn_with_state(auth, basic_auth_middleware));
/// ```
pub async fn basic_auth_middleware(
    State(auth): State<BasicAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredentials)?;

    auth.verify_header(header)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
