//! Lifecycle management.
//!
//! Startup order lives in `main`: config first, then logging and metrics,
//! then the upload directory, then the listener. Shutdown is coordinated
//! through a broadcast channel so in-flight requests drain before exit.

pub mod shutdown;

pub use shutdown::Shutdown;
