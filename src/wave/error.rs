//! Error taxonomy for wave operations.
//!
//! Only `Transport` is ever retried, and only inside the transport. Every
//! other kind reaches the caller unmodified.

use thiserror::Error;

use crate::transport::TransportError;
use crate::wave::types::{ErrorDetail, WaveHandle};

/// A response that violates the service contract.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("start response carried no wave_id{}", describe_detail(.detail))]
    MissingHandle { detail: Option<ErrorDetail> },

    #[error("wave {handle} reported needs_approval without an approval_request_id")]
    ApprovalIdMissing { handle: WaveHandle },

    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn describe_detail(detail: &Option<ErrorDetail>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" (service reported {})", d))
        .unwrap_or_default()
}

/// Discriminant of `WaveError`, for callers that branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Timeout,
    RemoteFailure,
    Validation,
}

/// Errors returned by the bindings and the lifecycle orchestrator.
#[derive(Debug, Error)]
pub enum WaveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("wave {handle} did not reach a terminal state within {deadline_ms} ms")]
    Timeout { handle: WaveHandle, deadline_ms: u64 },

    #[error("wave failed: {0}")]
    RemoteFailure(ErrorDetail),

    #[error("{operation}: {field} is required")]
    Validation {
        operation: &'static str,
        field: &'static str,
    },
}

impl WaveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WaveError::Transport(_) => ErrorKind::Transport,
            WaveError::Protocol(_) => ErrorKind::Protocol,
            WaveError::Timeout { .. } => ErrorKind::Timeout,
            WaveError::RemoteFailure(_) => ErrorKind::RemoteFailure,
            WaveError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Stable process exit code for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Validation => exit_codes::INVALID,
            ErrorKind::Transport => exit_codes::TRANSPORT,
            ErrorKind::Protocol => exit_codes::PROTOCOL,
            ErrorKind::Timeout => exit_codes::TIMEOUT,
            ErrorKind::RemoteFailure => exit_codes::REMOTE_FAILURE,
        }
    }
}

/// Result type for wave operations.
pub type WaveResult<T> = Result<T, WaveError>;

/// Stable exit codes for the binaries.
pub mod exit_codes {
    /// Wave completed and the audit record was retrieved.
    pub const OK: i32 = 0;
    /// Invalid configuration or missing identifier.
    pub const INVALID: i32 = 2;
    /// Service unreachable or retry budget exhausted.
    pub const TRANSPORT: i32 = 3;
    /// Service broke the response contract.
    pub const PROTOCOL: i32 = 4;
    /// Hard deadline exceeded while polling.
    pub const TIMEOUT: i32 = 5;
    /// Wave reported `failed`.
    pub const REMOTE_FAILURE: i32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WaveError::RemoteFailure(ErrorDetail {
            code: "POLICY_DENIED".into(),
            message: "write blocked".into(),
            node: "write_report".into(),
        });
        assert_eq!(
            err.to_string(),
            "wave failed: [POLICY_DENIED] write blocked (node: write_report)"
        );

        let err = WaveError::Timeout {
            handle: WaveHandle::new("w9"),
            deadline_ms: 180_000,
        };
        assert_eq!(
            err.to_string(),
            "wave w9 did not reach a terminal state within 180000 ms"
        );

        let err = WaveError::from(ProtocolError::MissingHandle { detail: None });
        assert_eq!(err.to_string(), "protocol violation: start response carried no wave_id");
    }

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            WaveError::Validation { operation: "start", field: "agent_id" },
            WaveError::from(ProtocolError::ApprovalIdMissing { handle: WaveHandle::new("w1") }),
            WaveError::Timeout { handle: WaveHandle::new("w1"), deadline_ms: 1 },
            WaveError::RemoteFailure(ErrorDetail::default()),
            WaveError::from(TransportError::InvalidTarget("x".into())),
        ];

        let mut codes: Vec<i32> = errors.iter().map(WaveError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(!codes.contains(&exit_codes::OK));
    }
}
