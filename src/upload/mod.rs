//! File upload safety pipeline.
//!
//! # Data Flow
//! ```text
//! multipart bytes + declared filename
//!     → validate.rs (empty, size, extension allow-list)
//!     → sniff.rs (magic bytes / UTF-8 text detection)
//!     → validate.rs (declared extension must match detected type)
//!     → store.rs (generated name, canonical containment, symlink check, write)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: allow-listing, sniffing and path containment are
//!   independent layers; none substitutes for another
//! - The original filename never reaches the filesystem; only its validated
//!   extension survives, appended to a random token
//! - Validation failures are client errors (422); path-safety failures are
//!   invariant errors (500) and abort before any write

pub mod sniff;
pub mod store;
pub mod validate;

pub use store::{StoreError, UploadStore};
pub use validate::{validate, UploadRejection, ALLOWED_EXTENSIONS};
