//! Wave domain types.
//!
//! # Entities
//! - `WaveRequest`: immutable input to one lifecycle
//! - `WaveHandle`: service-assigned identifier, fixed once assigned
//! - `StatusSnapshot`: one poll result; `approval_request_id` is expected
//!   iff status is `needs_approval`
//! - `ErrorDetail`: canonical `{code, message, node}` for failed Waves
//! - `AuditRecord`: read-once evidence bundle after completion
//!
//! None of these outlive a single lifecycle invocation.

pub mod error;
pub mod types;

pub use error::{exit_codes, ErrorKind, ProtocolError, WaveError, WaveResult};
pub use types::{
    ApprovalAck, ApprovalDecision, ApprovalRecord, AuditEvent, AuditRecord, ErrorDetail,
    LlmInvocation, StartAck, StatusSnapshot, WaveHandle, WaveRequest, WaveStatus,
};
