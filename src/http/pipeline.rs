//! Request middleware pipeline.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → resolve correlation id, attach as request extension
//!     → /health: skip rate limiting entirely
//!     → rate-limit check (per client IP); over limit → 429 problem
//!     → downstream handler
//!     → render any parked ApiError into a problem body
//!     → convert bare error responses (405, 408, 413, ...) to problems
//!     → stamp X-Correlation-ID onto the response
//! ```
//!
//! # Design Decisions
//! - One rendering point: handlers park errors, the pipeline renders them
//!   with the request's correlation id
//! - Liveness checks are never throttled
//! - Rejected requests are not recorded in the client's window

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::http::correlation::CorrelationId;
use crate::http::problem::{ApiError, PendingProblem, PROBLEM_CONTENT_TYPE};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Path exempt from rate limiting.
pub const HEALTH_PATH: &str = "/health";

/// The cross-cutting middleware wrapped around every route.
pub async fn request_pipeline(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let correlation = CorrelationId::resolve(request.headers());
    request.extensions_mut().insert(correlation.clone());

    let method = request.method().to_string();
    let exempt = request.uri().path() == HEALTH_PATH;

    let mut response = if exempt {
        next.run(request).await
    } else {
        let client = addr.ip().to_string();

        if state.limiter.allow(&client, Instant::now()) {
            next.run(request).await
        } else {
            tracing::warn!(client = %client, correlation_id = %correlation, "Rate limit exceeded");
            metrics::record_rate_limited();
            ApiError::rate_limited().into_problem_response(correlation.as_str())
        }
    };

    if let Some(PendingProblem(error)) = response.extensions_mut().remove::<PendingProblem>() {
        response = error.into_problem_response(correlation.as_str());
    } else if is_bare_error(&response) {
        // Errors produced below the handlers (method mismatch, timeout,
        // body-limit) still leave the process in the problem shape.
        let status = response.status();
        let message = status.canonical_reason().unwrap_or("HTTP error");
        response = ApiError::http(status, message).into_problem_response(correlation.as_str());
    }

    correlation.stamp(&mut response);
    metrics::record_request(&method, response.status().as_u16(), started);
    response
}

/// An error-status response that does not already speak the problem shape.
fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return false;
    }
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(true, |ct| !ct.starts_with(PROBLEM_CONTENT_TYPE))
}

/// Turn a handler panic into a parked internal error.
///
/// The payload text is carried only as far as the pipeline's renderer, which
/// logs it sanitized and emits the fixed generic detail.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown error".to_string()
    };
    ApiError::internal(message).into_response()
}
