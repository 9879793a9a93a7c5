//! feature-board: a small web service with a hardened request pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                 FEATURE BOARD                     │
//!                  │                                                   │
//!  Client Request  │  ┌─────────┐   ┌──────────┐   ┌───────────────┐  │
//!  ────────────────┼─▶│  http   │──▶│ pipeline │──▶│   handlers    │  │
//!                  │  │ server  │   │ (corr-id,│   │ features/items│  │
//!                  │  └─────────┘   │  limiter,│   │    /upload    │  │
//!                  │                │  problem │   └───────┬───────┘  │
//!                  │                │  render) │           │          │
//!                  │                └──────────┘           ▼          │
//!                  │                               ┌───────────────┐  │
//!                  │                               │ upload safety │  │
//!                  │                               │ sniff/validate│  │
//!                  │                               │    /store     │  │
//!                  │                               └───────────────┘  │
//!                  │  ┌────────────────────────────────────────────┐  │
//!                  │  │           Cross-Cutting Concerns            │  │
//!                  │  │  ┌────────┐ ┌──────────┐ ┌───────────────┐ │  │
//!                  │  │  │ config │ │ security │ │ observability │ │  │
//!                  │  │  │        │ │ limiter+ │ │ logging +     │ │  │
//!                  │  │  │        │ │ sanitize │ │ metrics       │ │  │
//!                  │  │  └────────┘ └──────────┘ └───────────────┘ │  │
//!                  │  └────────────────────────────────────────────┘  │
//!                  └──────────────────────────────────────────────────┘
//! ```
//!
//! Every request passes through the pipeline: correlation-id assignment,
//! rate-limit enforcement, handler dispatch, single-point problem rendering,
//! response header stamping. All state is in-memory and process-lifetime.

// Core subsystems
pub mod config;
pub mod http;
pub mod store;
pub mod upload;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
