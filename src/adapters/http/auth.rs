//! Shared-Secret Authentication Middleware
//!
//! Every inventory route requires the `x-api-key` header to match the
//! configured secret. The check runs as a route layer, ahead of path
//! and query extraction, so a bad key short-circuits with 401 before
//! any workflow or catalog call happens.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use super::errors::json_error;
use crate::adapters::catalog::API_KEY_HEADER;

/// Validates caller-supplied API keys.
#[derive(Clone)]
pub struct ApiKeyGuard {
    /// Expected secret. Never logged.
    expected: Arc<str>,
}

impl ApiKeyGuard {
    /// Create a guard for the given secret.
    pub fn new(expected: impl Into<Arc<str>>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// Whether the request headers carry the expected key.
    pub fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|given| keys_match(given, &self.expected))
    }
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard").finish_non_exhaustive()
    }
}

/// Constant-time key comparison.
///
/// Both keys are padded to the longer length with different fill bytes,
/// so a length mismatch costs the same as a content mismatch.
fn keys_match(given: &str, expected: &str) -> bool {
    let len = given.len().max(expected.len());
    let mut lhs = vec![0u8; len];
    let mut rhs = vec![0xFFu8; len];
    lhs[..given.len()].copy_from_slice(given.as_bytes());
    rhs[..expected.len()].copy_from_slice(expected.as_bytes());

    let same_len = given.len().ct_eq(&expected.len());
    (same_len & lhs.ct_eq(&rhs)).into()
}

/// Axum middleware rejecting requests without a valid key.
pub async fn require_api_key(
    State(guard): State<ApiKeyGuard>,
    request: Request,
    next: Next,
) -> Response {
    if !guard.is_authorized(request.headers()) {
        warn!(
            path = %request.uri().path(),
            key_present = request.headers().contains_key(API_KEY_HEADER),
            "Rejected request with invalid API key"
        );
        return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "invalid credentials");
    }
    next.run(request).await
}
