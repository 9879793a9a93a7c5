//! Per-client sliding-window rate limiting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Sliding-window request limiter keyed by client identity.
///
/// Each client owns an ordered window of request timestamps, pruned lazily on
/// every check. The map is sharded, so one client's check never blocks
/// another's. Windows are created on first sight of a client and live for the
/// process lifetime.
pub struct RateLimiter {
    windows: DashMap<String, VecDeque<Instant>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            limit: config.requests_per_window as usize,
            window: Duration::from_millis(config.window_ms),
        }
    }

    /// Check whether a request from `client` at `now` is within the limit.
    ///
    /// Evicts timestamps older than the trailing window, then either records
    /// `now` and accepts, or rejects without recording. The entry guard
    /// serializes the whole evict-check-append sequence for one client.
    pub fn allow(&self, client: &str, now: Instant) -> bool {
        let mut window = self.windows.entry(client.to_string()).or_default();

        if let Some(threshold) = now.checked_sub(self.window) {
            while window.front().is_some_and(|&t| t < threshold) {
                window.pop_front();
            }
        }

        if window.len() >= self.limit {
            return false;
        }
        window.push_back(now);
        true
    }

    /// Number of distinct clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
