//! The operations the lifecycle consumes.

use std::future::Future;

use crate::wave::{
    ApprovalAck, ApprovalDecision, AuditRecord, StartAck, StatusSnapshot, WaveHandle, WaveRequest,
    WaveResult,
};

/// Remote wave service as seen by the orchestrator.
///
/// Futures are `Send` so lifecycles can be spawned onto a multi-threaded runtime.
pub trait WaveApi: Send + Sync {
    /// `POST /api/waves/run`
    fn start(&self, request: &WaveRequest) -> impl Future<Output = WaveResult<StartAck>> + Send;

    /// `GET /api/waves/{wave_id}/status`
    fn status(&self, handle: &WaveHandle)
        -> impl Future<Output = WaveResult<StatusSnapshot>> + Send;

    /// `POST /api/approvals/{approval_request_id}`
    fn approve(
        &self,
        approval_request_id: &str,
        decision: &ApprovalDecision,
    ) -> impl Future<Output = WaveResult<ApprovalAck>> + Send;

    /// `GET /api/waves/{wave_id}/audit/export`
    fn audit(&self, handle: &WaveHandle) -> impl Future<Output = WaveResult<AuditRecord>> + Send;
}
