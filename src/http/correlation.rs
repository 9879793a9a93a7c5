//! Correlation ID resolution and propagation.
//!
//! # Responsibilities
//! - Reuse a non-empty inbound `X-Correlation-ID` verbatim
//! - Generate a fresh UUID when the header is absent
//! - Carry the id as a request extension, available to handlers and the
//!   problem renderer
//!
//! # Design Decisions
//! - The id is attached as early as possible, before any handler or error
//!   path runs
//! - The inbound value is opaque: no format validation, enabling trace
//!   stitching across services with different id schemes

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Response};
use uuid::Uuid;

/// Header carrying the correlation id, inbound and outbound.
pub const X_CORRELATION_ID: &str = "x-correlation-id";

/// Opaque per-request identifier.
#[derive(Debug, Clone)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Resolve the id for a request: inbound header value when present and
    /// non-empty, otherwise a fresh UUID v4.
    pub fn resolve(headers: &HeaderMap) -> Self {
        headers
            .get(X_CORRELATION_ID)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.to_string()))
            .unwrap_or_else(Self::generate)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stamp the id onto a response's `X-Correlation-ID` header.
    pub fn stamp<B>(&self, response: &mut Response<B>) {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            response.headers_mut().insert(X_CORRELATION_ID, value);
        }
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CorrelationId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The pipeline inserts the extension before handlers run; resolving
        // from headers again covers requests that bypassed it (unit tests).
        Ok(parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(|| Self::resolve(&parts.headers)))
    }
}
