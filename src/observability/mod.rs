//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transport, bindings, orchestrator produce:
//!     → logging.rs (structured tracing events on stderr)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - One warn event per transport retry, with attempt and delay
//! - Every request carries an x-request-id that is also logged
//! - Metrics are cheap (atomic increments) and exporter-agnostic

pub mod logging;
pub mod metrics;
