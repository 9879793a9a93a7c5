//! RFC 7807 problem-detail error envelope.
//!
//! # Responsibilities
//! - Model the four error categories as one tagged type
//! - Map each category to status, title and a `/problems/{code}` type URI
//! - Render the uniform problem body at a single point, with the request's
//!   correlation id and sanitized detail
//! - Log every domain/validation error and every fault, safely
//!
//! # Design Decisions
//! - Handlers return `Result<_, ApiError>`; the error value is carried
//!   through the pipeline and rendered once, not per call site
//! - Unhandled faults expose a fixed generic detail; the real message is
//!   logged (sanitized), never sent to the client

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::correlation::X_CORRELATION_ID;
use crate::security::sanitize::{safe_log_error, sanitize_detail};

/// Content type of every error response.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Base URI for problem type identifiers.
pub const PROBLEM_TYPE_BASE: &str = "https://example.com/problems";

/// Domain error codes used by business logic.
pub const CODE_VALIDATION_ERROR: &str = "validation_error";
pub const CODE_NOT_FOUND: &str = "not_found";
pub const CODE_RATE_LIMITED: &str = "rate_limited";
pub const CODE_HTTP_ERROR: &str = "http_error";
const CODE_INTERNAL_ERROR: &str = "internal_error";

/// Fixed client-visible detail for unanticipated faults.
const INTERNAL_DETAIL: &str = "An unexpected error occurred";

/// One failed field in a payload-shape validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `body.title`.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The error taxonomy carried through the request pipeline.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Expected error raised by business logic with an explicit code,
    /// message and status.
    #[error("{message}")]
    Domain {
        code: &'static str,
        message: String,
        status: StatusCode,
    },
    /// Structural or type failure in the request payload.
    #[error("validation failed")]
    Validation { errors: Vec<FieldError> },
    /// Generic transport-level error (unmatched route, bad method, timeout).
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
    },
    /// Unanticipated fault. The message never reaches the client.
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn domain(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self::Domain {
            code,
            message: message.into(),
            status,
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::domain(
            CODE_VALIDATION_ERROR,
            message,
            StatusCode::UNPROCESSABLE_ENTITY,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::domain(CODE_NOT_FOUND, message, StatusCode::NOT_FOUND)
    }

    pub fn rate_limited() -> Self {
        Self::domain(
            CODE_RATE_LIMITED,
            "Rate limit exceeded",
            StatusCode::TOO_MANY_REQUESTS,
        )
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain { status, .. } => *status,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Http { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Domain { code, .. } => match *code {
                CODE_VALIDATION_ERROR => "Validation Error",
                CODE_NOT_FOUND => "Not Found",
                CODE_RATE_LIMITED => "Too Many Requests",
                CODE_HTTP_ERROR => "HTTP Error",
                _ => "Bad Request",
            },
            Self::Validation { .. } => "Validation Error",
            Self::Http { .. } => "HTTP Error",
            Self::Internal { .. } => "Internal Server Error",
        }
    }

    fn type_uri(&self) -> String {
        let code = match self {
            Self::Domain { code, .. } => code,
            Self::Validation { .. } => CODE_VALIDATION_ERROR,
            Self::Http { .. } => CODE_HTTP_ERROR,
            Self::Internal { .. } => CODE_INTERNAL_ERROR,
        };
        format!("{PROBLEM_TYPE_BASE}/{code}")
    }

    /// Raw detail before sanitization. Faults get the fixed generic string.
    fn raw_detail(&self) -> String {
        match self {
            Self::Domain { message, .. } | Self::Http { message, .. } => message.clone(),
            Self::Validation { errors } => errors
                .iter()
                .map(|e| format!("{}: {}", e.path, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            Self::Internal { .. } => INTERNAL_DETAIL.to_string(),
        }
    }

    fn log(&self, correlation_id: &str) {
        match self {
            Self::Domain { code, message, .. } => {
                safe_log_error(&format!("API Error: {code}"), correlation_id, message);
            }
            Self::Validation { .. } => {
                safe_log_error("Validation error", correlation_id, &self.raw_detail());
            }
            // Transport-level errors carry no interesting detail.
            Self::Http { .. } => {}
            Self::Internal { message } => {
                safe_log_error("Unhandled exception", correlation_id, message);
            }
        }
    }

    /// Render the problem response. The single rendering point: the pipeline
    /// calls this for every error it carries or intercepts.
    pub fn into_problem_response(self, correlation_id: &str) -> Response {
        self.log(correlation_id);

        let status = self.status();
        let problem = ProblemDetail {
            type_uri: self.type_uri(),
            title: self.title().to_string(),
            status: status.as_u16(),
            detail: sanitize_detail(&self.raw_detail()),
            correlation_id: correlation_id.to_string(),
        };

        let mut response = (status, axum::Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        if status == StatusCode::TOO_MANY_REQUESTS {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        if let Ok(value) = HeaderValue::from_str(correlation_id) {
            response.headers_mut().insert(X_CORRELATION_ID, value);
        }
        response
    }
}

/// The RFC 7807 body shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub correlation_id: String,
}

/// An error parked on a response, awaiting the pipeline's rendering pass.
#[derive(Debug, Clone)]
pub struct PendingProblem(pub ApiError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Not rendered here: the pipeline owns rendering so the body can
        // carry the request's correlation id.
        let mut response = self.status().into_response();
        response.extensions_mut().insert(PendingProblem(self));
        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(vec![FieldError::new("path", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_codes_map_to_titles() {
        let cases = [
            (CODE_VALIDATION_ERROR, "Validation Error"),
            (CODE_NOT_FOUND, "Not Found"),
            (CODE_RATE_LIMITED, "Too Many Requests"),
            (CODE_HTTP_ERROR, "HTTP Error"),
            ("something_else", "Bad Request"),
        ];
        for (code, title) in cases {
            let err = ApiError::domain(code, "msg", StatusCode::BAD_REQUEST);
            assert_eq!(err.title(), title, "code {code}");
            assert_eq!(err.type_uri(), format!("{PROBLEM_TYPE_BASE}/{code}"));
        }
    }

    #[test]
    fn validation_detail_joins_field_errors() {
        let err = ApiError::validation(vec![
            FieldError::new("body.title", "field required"),
            FieldError::new("body.value", "not an integer"),
        ]);
        assert_eq!(
            err.raw_detail(),
            "body.title: field required; body.value: not an integer"
        );
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_detail_is_fixed() {
        let err = ApiError::internal("secret db password leaked in panic");
        assert_eq!(err.raw_detail(), "An unexpected error occurred");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rate_limited_response_carries_retry_after() {
        let response = ApiError::rate_limited().into_problem_response("cid-1");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            HeaderValue::from_static("1")
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE)
        );
        assert_eq!(
            response.headers().get(X_CORRELATION_ID).unwrap(),
            HeaderValue::from_static("cid-1")
        );
    }

    #[test]
    fn problem_detail_in_body_is_sanitized() {
        let err = ApiError::validation_error("call me at user@example.com");
        assert!(err.raw_detail().contains("user@example.com"));
        let response = err.into_problem_response("cid-2");
        // Body rendering goes through sanitize_detail; spot-check the input.
        assert_eq!(
            sanitize_detail("call me at user@example.com"),
            "call me at u***@example.com"
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
