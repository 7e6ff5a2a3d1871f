//! Retry logic.
//!
//! # Responsibilities
//! - Classify HTTP statuses as retryable or terminal
//! - Hold the retry budget and backoff parameters for one transport
//!
//! # Design Decisions
//! - Network failures are always retryable
//! - Only 408, 429, 500, 502, 503, 504 are retried; every other status fails at once
//! - Method is not considered: the remote service tolerates replayed starts

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

const RETRYABLE_STATUSES: [StatusCode; 6] = [
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Check whether a response status should be retried.
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Retry budget and backoff schedule for a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry `retry` (1-indexed).
    pub fn delay_for(&self, retry: u32) -> Duration {
        calculate_backoff(retry, self.base_delay_ms, self.max_delay_ms)
    }

    /// Total attempts a single request may consume.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}
