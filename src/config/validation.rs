//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. Pure function, and it
//! reports every violation, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),
    #[error("rate_limit.requests_per_window must be at least 1")]
    ZeroRateLimit,
    #[error("rate_limit.window_ms must be at least 1")]
    ZeroRateWindow,
    #[error("timeouts.request_secs must be at least 1")]
    ZeroRequestTimeout,
    #[error("upload.dir must not be empty")]
    EmptyUploadDir,
    #[error("upload.max_bytes must be at least 1")]
    ZeroUploadLimit,
    #[error("observability.log_level {0:?} is not one of trace/debug/info/warn/error")]
    InvalidLogLevel(String),
    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting all violations.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.rate_limit.requests_per_window == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }
    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::ZeroRateWindow);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.upload.dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyUploadDir);
    }
    if config.upload.max_bytes == 0 {
        errors.push(ValidationError::ZeroUploadLimit);
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.rate_limit.requests_per_window = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroRateLimit));
    }
}
