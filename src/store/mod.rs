//! Volatile in-memory stores.
//!
//! State is process-lifetime only; durability is an explicit non-goal. Both
//! stores are plain service objects owned by the router state and shared via
//! `Arc` — no statics. Locks guard short, await-free critical sections.

pub mod features;
pub mod items;

pub use features::{Feature, FeatureCreate, FeatureStore, VoteRequest};
pub use items::{Item, ItemStore};
