//! Metrics collection.
//!
//! # Metrics
//! - `wave_transport_requests_total` (counter): logical requests by outcome
//! - `wave_transport_retries_total` (counter): retries by reason (status, network)
//! - `wave_status_polls_total` (counter): status polls by observed status
//! - `wave_approvals_submitted_total` (counter): approvals accepted by the service
//! - `wave_lifecycle_duration_seconds` (histogram): lifecycle wall time by outcome
//!
//! # Design Decisions
//! - Records through the `metrics` facade only; the embedding process owns the
//!   recorder/exporter, so these calls are no-ops when none is installed

use std::time::Duration;

pub fn record_request(outcome: &'static str) {
    metrics::counter!("wave_transport_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_retry(reason: &'static str) {
    metrics::counter!("wave_transport_retries_total", "reason" => reason).increment(1);
}

pub fn record_poll(status: &str) {
    metrics::counter!("wave_status_polls_total", "status" => status.to_string()).increment(1);
}

pub fn record_approval() {
    metrics::counter!("wave_approvals_submitted_total").increment(1);
}

pub fn record_lifecycle(outcome: &'static str, elapsed: Duration) {
    metrics::histogram!("wave_lifecycle_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
