//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer stack)
//!     → pipeline.rs (correlation id, rate limit, problem rendering)
//!     → handlers.rs (CRUD glue, upload orchestration)
//!     → problem.rs (error envelope) / extract.rs (payload-shape rejections)
//! ```

pub mod correlation;
pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod problem;
pub mod server;

pub use correlation::{CorrelationId, X_CORRELATION_ID};
pub use problem::{ApiError, ProblemDetail};
pub use server::HttpServer;
