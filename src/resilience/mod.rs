//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to the execution service:
//!     → transport (per-attempt timeout from reqwest)
//!     → On failure: retries.rs (classify, consult budget)
//!     → backoff.rs (sleep min(base * 2^(k-1), max) before retry k)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Retry happens in exactly one layer; callers above never retry
//! - Backoff is deterministic so the schedule is testable

pub mod backoff;
pub mod retries;

pub use retries::{is_retryable_status, RetryPolicy};
