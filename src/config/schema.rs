//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the wave lifecycle client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote execution service settings.
    pub service: ServiceConfig,

    /// Transport retry configuration.
    pub retries: RetryConfig,

    /// Status polling cadence and hard deadline.
    pub polling: PollingConfig,

    /// Identity used when the client submits approvals.
    pub approval: ApprovalConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base address of the execution service (e.g., "http://127.0.0.1:8000").
    pub base_url: String,

    /// Per-attempt request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            user_agent: concat!("wave-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay_ms: 1000,
            max_delay_ms: 8000,
        }
    }
}

/// Polling cadence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval used for the first `fast_poll_count` iterations.
    pub fast_interval_ms: u64,

    /// Interval used once the fast window is exhausted.
    pub slow_interval_ms: u64,

    /// Number of iterations that use the fast interval.
    pub fast_poll_count: u32,

    /// Symmetric jitter spread applied to every interval.
    pub jitter_ms: u64,

    /// Hard wall-clock deadline for one lifecycle, measured from start.
    pub deadline_ms: u64,
}

impl PollingConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: 2000,
            slow_interval_ms: 5000,
            fast_poll_count: 5,
            jitter_ms: 300,
            deadline_ms: 180_000,
        }
    }
}

/// Approval submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Identity recorded as the approver. Falls back to the request's agent_id.
    pub approved_by: Option<String>,

    /// Free-form note attached to every approval.
    pub note: String,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            approved_by: None,
            note: "approved by wave-client lifecycle".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
