//! Resilient lifecycle client for remote Wave execution.
//!
//! Dispatches a Wave to the execution service, polls it to a terminal state
//! within a hard deadline, and returns the audit record.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod rpc;
pub mod transport;
pub mod wave;

pub use config::ClientConfig;
pub use lifecycle::{LifecycleOutcome, WaveOrchestrator};
pub use rpc::{WaveApi, WaveClient};
pub use transport::{ResilientTransport, TransportError};
pub use wave::{ErrorKind, WaveError, WaveHandle, WaveRequest};
