//! HTTP bindings for the wave service.
//!
//! Each operation validates its identifiers before touching the network,
//! then delegates to the resilient transport and decodes the typed response.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ClientConfig;
use crate::rpc::api::WaveApi;
use crate::transport::{ResilientTransport, TransportError, TransportRequest, TransportResponse};
use crate::wave::{
    ApprovalAck, ApprovalDecision, AuditRecord, ProtocolError, StartAck, StatusSnapshot,
    WaveError, WaveHandle, WaveRequest, WaveResult,
};

/// Typed client for the four wave operations.
#[derive(Debug, Clone)]
pub struct WaveClient {
    transport: ResilientTransport,
}

impl WaveClient {
    pub fn new(transport: ResilientTransport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::new(ResilientTransport::from_config(config)?))
    }

    pub fn transport(&self) -> &ResilientTransport {
        &self.transport
    }

    pub async fn start(&self, request: &WaveRequest) -> WaveResult<StartAck> {
        require("start", "agent_id", &request.agent_id)?;
        require("start", "wave_template_id", &request.wave_template_id)?;

        let body = json!({
            "agent_id": request.agent_id,
            "wave_template_id": request.wave_template_id,
            "policy_version": request.policy_version,
            "intent": request.intent,
            "context_refs": request.context_refs,
        });
        let response = self
            .transport
            .execute(&TransportRequest::post(["api", "waves", "run"], body))
            .await?;

        let ack: StartAck = decode("start", &response)?;
        tracing::debug!(
            agent_id = %request.agent_id,
            wave_template_id = %request.wave_template_id,
            wave_id = ?ack.wave_id,
            "Start acknowledged"
        );
        Ok(ack)
    }

    pub async fn status(&self, handle: &WaveHandle) -> WaveResult<StatusSnapshot> {
        require("status", "wave_id", handle.as_str())?;

        let response = self
            .transport
            .execute(&TransportRequest::get([
                "api",
                "waves",
                handle.as_str(),
                "status",
            ]))
            .await?;
        decode("status", &response)
    }

    /// Submit an approval. Only needed for templates with a human gate.
    pub async fn approve(
        &self,
        approval_request_id: &str,
        decision: &ApprovalDecision,
    ) -> WaveResult<ApprovalAck> {
        require("approve", "approval_request_id", approval_request_id)?;
        require("approve", "approved_by", &decision.approved_by)?;

        let body = json!({
            "approved_by": decision.approved_by,
            "note": decision.note,
        });
        let response = self
            .transport
            .execute(&TransportRequest::post(
                ["api", "approvals", approval_request_id],
                body,
            ))
            .await?;
        decode("approve", &response)
    }

    /// Fetch the audit export. Meaningful only after `complete` was observed.
    pub async fn audit(&self, handle: &WaveHandle) -> WaveResult<AuditRecord> {
        require("audit", "wave_id", handle.as_str())?;

        let response = self
            .transport
            .execute(&TransportRequest::get([
                "api",
                "waves",
                handle.as_str(),
                "audit",
                "export",
            ]))
            .await?;
        decode("audit", &response)
    }
}

impl WaveApi for WaveClient {
    async fn start(&self, request: &WaveRequest) -> WaveResult<StartAck> {
        WaveClient::start(self, request).await
    }

    async fn status(&self, handle: &WaveHandle) -> WaveResult<StatusSnapshot> {
        WaveClient::status(self, handle).await
    }

    async fn approve(
        &self,
        approval_request_id: &str,
        decision: &ApprovalDecision,
    ) -> WaveResult<ApprovalAck> {
        WaveClient::approve(self, approval_request_id, decision).await
    }

    async fn audit(&self, handle: &WaveHandle) -> WaveResult<AuditRecord> {
        WaveClient::audit(self, handle).await
    }
}

fn require(operation: &'static str, field: &'static str, value: &str) -> WaveResult<()> {
    if value.trim().is_empty() {
        return Err(WaveError::Validation { operation, field });
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: &TransportResponse,
) -> WaveResult<T> {
    response
        .json()
        .map_err(|source| ProtocolError::Decode { operation, source }.into())
}
