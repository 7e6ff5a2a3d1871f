//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! TransportRequest { method, segments, body }
//!     → client.rs (resolve against base URL, attach x-request-id)
//!     → reqwest (per-attempt timeout)
//!     → 2xx: TransportResponse
//!     → 408/429/500/502/503/504 or network error: backoff, retry
//!     → any other status: TransportError::Rejected, body kept as diagnostic
//! ```
//!
//! Knows nothing about Waves.

pub mod client;
pub mod error;
pub mod request;

pub use client::ResilientTransport;
pub use error::TransportError;
pub use request::{TransportRequest, TransportResponse};
