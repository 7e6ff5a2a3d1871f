//! Wave lifecycle orchestrator.
//!
//! # Responsibilities
//! - Start a Wave and hold its handle
//! - Poll status on a fast/slow jittered cadence until a terminal state
//! - Submit each observed approval id at most once
//! - Enforce the hard deadline at every iteration boundary
//! - Return the audit record on completion, or a typed failure

use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::{ApprovalConfig, ClientConfig};
use crate::lifecycle::cadence::PollCadence;
use crate::lifecycle::state::{ApprovalLedger, LifecyclePhase, PhaseTracker};
use crate::observability::metrics;
use crate::rpc::{WaveApi, WaveClient};
use crate::transport::TransportError;
use crate::wave::{
    ApprovalDecision, AuditRecord, ErrorKind, ProtocolError, WaveError, WaveHandle, WaveRequest,
    WaveResult, WaveStatus,
};

/// Terminal success of one lifecycle.
#[derive(Debug, Clone)]
pub struct LifecycleOutcome {
    pub handle: WaveHandle,
    pub audit: AuditRecord,
    /// Status calls issued, including the one that observed `complete`.
    pub polls: u32,
    /// Approval ids submitted, in order.
    pub approvals: Vec<String>,
    pub elapsed: Duration,
}

/// Drives Waves from start to a terminal state.
///
/// Holds no per-Wave state; one orchestrator may run many lifecycles
/// concurrently, each with its own deadline and approval ledger.
#[derive(Debug, Clone)]
pub struct WaveOrchestrator<A> {
    api: A,
    cadence: PollCadence,
    deadline: Duration,
    approval: ApprovalConfig,
}

impl WaveOrchestrator<WaveClient> {
    /// Orchestrator over the HTTP bindings.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(WaveClient::from_config(config)?, config))
    }
}

impl<A: WaveApi> WaveOrchestrator<A> {
    pub fn new(api: A, config: &ClientConfig) -> Self {
        Self {
            api,
            cadence: PollCadence::from(&config.polling),
            deadline: config.polling.deadline(),
            approval: config.approval.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    fn deadline_ms(&self) -> u64 {
        u64::try_from(self.deadline.as_millis()).unwrap_or(u64::MAX)
    }

    /// Run one Wave to a terminal outcome.
    pub async fn run(&self, request: &WaveRequest) -> WaveResult<LifecycleOutcome> {
        let started = Instant::now();
        let result = self.drive(request, started).await;

        let outcome = match &result {
            Ok(_) => "complete",
            Err(e) => match e.kind() {
                ErrorKind::RemoteFailure => "failed",
                ErrorKind::Timeout => "timeout",
                _ => "error",
            },
        };
        metrics::record_lifecycle(outcome, started.elapsed());

        result
    }

    async fn drive(&self, request: &WaveRequest, started: Instant) -> WaveResult<LifecycleOutcome> {
        let deadline = started + self.deadline();
        let mut phase = PhaseTracker::new();

        tracing::info!(
            agent_id = %request.agent_id,
            wave_template_id = %request.wave_template_id,
            deadline_ms = self.deadline_ms(),
            "Starting wave"
        );
        let handle = self.api.start(request).await?.into_handle()?;
        tracing::info!(wave_id = %handle, "Wave started");
        phase.advance(LifecyclePhase::Polling, Some(&handle));

        let mut ledger = ApprovalLedger::default();
        let mut polls: u32 = 0;

        loop {
            if Instant::now() > deadline {
                phase.advance(LifecyclePhase::TimedOut, Some(&handle));
                tracing::warn!(
                    wave_id = %handle,
                    polls,
                    deadline_ms = self.deadline_ms(),
                    "Wave deadline exceeded, abandoning"
                );
                return Err(WaveError::Timeout {
                    handle,
                    deadline_ms: self.deadline_ms(),
                });
            }

            polls += 1;
            let snapshot = self.api.status(&handle).await?;
            metrics::record_poll(snapshot.status.as_str());
            tracing::debug!(
                wave_id = %handle,
                poll = polls,
                status = %snapshot.status,
                approval_request_id = ?snapshot.approval_request_id,
                "Polled wave status"
            );

            match (&snapshot.status, snapshot.approval_request_id.as_deref()) {
                (WaveStatus::NeedsApproval, None) => {
                    phase.advance(LifecyclePhase::Failed, Some(&handle));
                    return Err(ProtocolError::ApprovalIdMissing { handle }.into());
                }
                // A running Wave may expose its approval id before the status flips.
                (WaveStatus::NeedsApproval, Some(approval_id))
                | (WaveStatus::Running, Some(approval_id)) => {
                    phase.advance(LifecyclePhase::AwaitingApproval, Some(&handle));
                    self.approve_once(&handle, approval_id, request, &mut ledger)
                        .await?;
                }
                (WaveStatus::Running, None) => {
                    phase.advance(LifecyclePhase::Polling, Some(&handle));
                }
                (WaveStatus::Complete, _) => {
                    let audit = self.api.audit(&handle).await?;
                    phase.advance(LifecyclePhase::Complete, Some(&handle));
                    tracing::info!(
                        wave_id = %handle,
                        polls,
                        approvals = ledger.ids().len(),
                        integrity_status = %audit.integrity_status,
                        "Wave complete"
                    );
                    return Ok(LifecycleOutcome {
                        handle,
                        audit,
                        polls,
                        approvals: ledger.into_ids(),
                        elapsed: started.elapsed(),
                    });
                }
                (WaveStatus::Failed, _) => {
                    phase.advance(LifecyclePhase::Failed, Some(&handle));
                    let detail = snapshot.error_detail();
                    tracing::warn!(
                        wave_id = %handle,
                        code = %detail.code,
                        node = %detail.node,
                        message = %detail.message,
                        "Wave failed"
                    );
                    return Err(WaveError::RemoteFailure(detail));
                }
                (WaveStatus::Other(value), _) => {
                    tracing::warn!(wave_id = %handle, status = %value, "Unknown wave status, continuing to poll");
                }
            }

            sleep(self.cadence.next_delay(polls)).await;
        }
    }

    async fn approve_once(
        &self,
        handle: &WaveHandle,
        approval_request_id: &str,
        request: &WaveRequest,
        ledger: &mut ApprovalLedger,
    ) -> WaveResult<()> {
        if ledger.contains(approval_request_id) {
            tracing::debug!(
                wave_id = %handle,
                approval_request_id,
                "Approval already submitted, skipping"
            );
            return Ok(());
        }

        let decision = ApprovalDecision {
            approved_by: self
                .approval
                .approved_by
                .clone()
                .unwrap_or_else(|| request.agent_id.clone()),
            note: Some(self.approval.note.clone()).filter(|n| !n.is_empty()),
        };

        let ack = self.api.approve(approval_request_id, &decision).await?;
        if ack.is_rejected() {
            let detail = ack.error.unwrap_or_default();
            tracing::warn!(
                wave_id = %handle,
                approval_request_id,
                code = %detail.code,
                "Approval rejected by service"
            );
            return Err(WaveError::RemoteFailure(detail));
        }

        ledger.record(approval_request_id);
        metrics::record_approval();
        tracing::info!(
            wave_id = %handle,
            approval_request_id,
            approved_by = %decision.approved_by,
            "Approval submitted"
        );
        Ok(())
    }
}
