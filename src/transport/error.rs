//! Transport failure types.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors surfaced by the resilient transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure that outlasted the retry budget.
    #[error("{method} {target}: network failure after {attempts} attempt(s): {source}")]
    Network {
        method: Method,
        target: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// Retryable status that outlasted the retry budget.
    #[error("{method} {target}: HTTP {status} after {attempts} attempt(s): {body}")]
    RetriesExhausted {
        method: Method,
        target: String,
        attempts: u32,
        status: StatusCode,
        body: String,
    },

    /// Status outside the retryable set; returned on the first attempt.
    #[error("{method} {target}: HTTP {status}: {body}")]
    Rejected {
        method: Method,
        target: String,
        status: StatusCode,
        body: String,
    },

    /// The request URL could not be built from the base address.
    #[error("invalid request target: {0}")]
    InvalidTarget(String),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransportError {
    /// Number of requests issued before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            TransportError::Network { attempts, .. }
            | TransportError::RetriesExhausted { attempts, .. } => *attempts,
            TransportError::Rejected { .. } => 1,
            TransportError::InvalidTarget(_) | TransportError::Client(_) => 0,
        }
    }

    /// HTTP status of the last response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::RetriesExhausted { status, .. }
            | TransportError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
