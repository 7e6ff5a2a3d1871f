//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function `&ClientConfig -> Result<(), Vec<ValidationError>>` and reports
//! every failure, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.service.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "service.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "service.base_url",
            format!("invalid URL '{}': {}", config.service.base_url, e),
        )),
    }

    if config.service.request_timeout_secs == 0 {
        errors.push(ValidationError::new("service.request_timeout_secs", "must be > 0"));
    }

    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::new("retries.base_delay_ms", "must be > 0"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must be >= retries.base_delay_ms",
        ));
    }

    if config.polling.fast_interval_ms == 0 {
        errors.push(ValidationError::new("polling.fast_interval_ms", "must be > 0"));
    }
    if config.polling.slow_interval_ms == 0 {
        errors.push(ValidationError::new("polling.slow_interval_ms", "must be > 0"));
    }
    if config.polling.jitter_ms > config.polling.slow_interval_ms {
        errors.push(ValidationError::new(
            "polling.jitter_ms",
            "must be <= polling.slow_interval_ms",
        ));
    }
    if config.polling.deadline_ms == 0 {
        errors.push(ValidationError::new("polling.deadline_ms", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
