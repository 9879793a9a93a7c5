//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-IP sliding window, checked by the pipeline)
//!
//! Outgoing text (error details, log records):
//!     → sanitize.rs (mask PII, strip control characters, cap log length)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a request over the limit is rejected before any handler runs
//! - No trust in client input: all client-derived text is sanitized on exit
//! - Rate-limit state is an explicit service object, never a global

pub mod rate_limit;
pub mod sanitize;

pub use rate_limit::RateLimiter;
