//! Metrics collection and exposition.
//!
//! # Metrics
//! - `board_requests_total` (counter): requests by method and status
//! - `board_request_duration_seconds` (histogram): latency distribution
//! - `board_rate_limited_total` (counter): requests rejected by the limiter
//! - `board_uploads_total` (counter): uploads by outcome (accepted/rejected)
//!
//! # Design Decisions
//! - Labels are bounded (method, status, outcome) — never client identity or
//!   request paths, which would explode cardinality

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and bind its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "board_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("board_request_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited() {
    counter!("board_rate_limited_total").increment(1);
}

/// Record an upload outcome ("accepted" or "rejected").
pub fn record_upload(outcome: &'static str) {
    counter!("board_uploads_total", "outcome" => outcome).increment(1);
}
