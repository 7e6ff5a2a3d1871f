//! Wave data model and wire-shape normalization.
//!
//! Response payloads are decoded through private `Raw*` structs and converted
//! into the public types with `#[serde(from = ...)]`, so the remote service's
//! compatibility quirks (nested vs. flat error fields, empty identifiers) are
//! resolved once at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wave::error::ProtocolError;

/// Handle assigned by the service when a Wave starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveHandle(String);

impl WaveHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for starting a Wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveRequest {
    pub agent_id: String,
    pub wave_template_id: String,
    pub policy_version: String,
    pub intent: String,
    /// Opaque references passed through verbatim.
    #[serde(default)]
    pub context_refs: Map<String, Value>,
}

impl WaveRequest {
    pub fn new(agent_id: impl Into<String>, wave_template_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            wave_template_id: wave_template_id.into(),
            policy_version: String::new(),
            intent: String::new(),
            context_refs: Map::new(),
        }
    }

    pub fn with_policy_version(mut self, policy_version: impl Into<String>) -> Self {
        self.policy_version = policy_version.into();
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = intent.into();
        self
    }

    pub fn with_context_ref(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context_refs.insert(key.into(), value.into());
        self
    }
}

/// Observed Wave state.
///
/// Values the client does not recognise are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WaveStatus {
    Running,
    NeedsApproval,
    Complete,
    Failed,
    Other(String),
}

impl WaveStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WaveStatus::Running => "running",
            WaveStatus::NeedsApproval => "needs_approval",
            WaveStatus::Complete => "complete",
            WaveStatus::Failed => "failed",
            WaveStatus::Other(value) => value,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WaveStatus::Complete | WaveStatus::Failed)
    }
}

impl From<String> for WaveStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => WaveStatus::Running,
            "needs_approval" => WaveStatus::NeedsApproval,
            "complete" => WaveStatus::Complete,
            "failed" => WaveStatus::Failed,
            _ => WaveStatus::Other(value),
        }
    }
}

impl From<WaveStatus> for String {
    fn from(status: WaveStatus) -> Self {
        match status {
            WaveStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical failure detail reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub node: String,
}

impl Default for ErrorDetail {
    fn default() -> Self {
        Self {
            code: "WAVE_FAILED".to_string(),
            message: "Wave failed".to_string(),
            node: "unknown".to_string(),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (node: {})", self.code, self.message, self.node)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawErrorDetail {
    code: Option<String>,
    message: Option<String>,
    node: Option<String>,
}

/// Error fields as they appear on the wire, nested or flat.
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorFields {
    #[serde(default)]
    error: Option<RawErrorDetail>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error_node: Option<String>,
}

impl ErrorFields {
    /// Merge both shapes into one `ErrorDetail`; nested fields win.
    fn normalize(self) -> Option<ErrorDetail> {
        let nested = self.error.unwrap_or_default();
        let code = nested.code.or(self.error_code);
        let message = nested.message.or(self.error_message);
        let node = nested.node.or(self.error_node);

        if code.is_none() && message.is_none() && node.is_none() {
            return None;
        }

        let defaults = ErrorDetail::default();
        Some(ErrorDetail {
            code: code.unwrap_or(defaults.code),
            message: message.unwrap_or(defaults.message),
            node: node.unwrap_or(defaults.node),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct RawStartAck {
    #[serde(default)]
    wave_id: Option<String>,
    #[serde(default)]
    status: Option<WaveStatus>,
    #[serde(flatten)]
    errors: ErrorFields,
}

/// Response to a start call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStartAck")]
pub struct StartAck {
    pub wave_id: Option<WaveHandle>,
    pub status: Option<WaveStatus>,
    pub error: Option<ErrorDetail>,
}

impl From<RawStartAck> for StartAck {
    fn from(raw: RawStartAck) -> Self {
        Self {
            wave_id: non_empty(raw.wave_id).map(WaveHandle),
            status: raw.status,
            error: raw.errors.normalize(),
        }
    }
}

impl StartAck {
    /// Take the handle, or fail with the service's reason attached.
    pub fn into_handle(self) -> Result<WaveHandle, ProtocolError> {
        self.wave_id
            .ok_or(ProtocolError::MissingHandle { detail: self.error })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatusSummary {
    #[serde(default)]
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    wave_id: Option<String>,
    status: WaveStatus,
    #[serde(default)]
    approval_request_id: Option<String>,
    #[serde(default)]
    summary: Option<StatusSummary>,
    #[serde(flatten)]
    errors: ErrorFields,
}

/// One observation of a Wave's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStatus")]
pub struct StatusSnapshot {
    pub wave_id: Option<WaveHandle>,
    pub status: WaveStatus,
    pub approval_request_id: Option<String>,
    pub error: Option<ErrorDetail>,
    pub output_path: Option<String>,
}

impl From<RawStatus> for StatusSnapshot {
    fn from(raw: RawStatus) -> Self {
        Self {
            wave_id: non_empty(raw.wave_id).map(WaveHandle),
            status: raw.status,
            approval_request_id: non_empty(raw.approval_request_id),
            error: raw.errors.normalize(),
            output_path: raw.summary.and_then(|s| s.output_path),
        }
    }
}

impl StatusSnapshot {
    pub fn new(status: WaveStatus) -> Self {
        Self {
            wave_id: None,
            status,
            approval_request_id: None,
            error: None,
            output_path: None,
        }
    }

    pub fn with_approval(mut self, approval_request_id: impl Into<String>) -> Self {
        self.approval_request_id = Some(approval_request_id.into());
        self
    }

    pub fn with_error(mut self, error: ErrorDetail) -> Self {
        self.error = Some(error);
        self
    }

    /// Failure detail, defaulted when the service sent none.
    pub fn error_detail(&self) -> ErrorDetail {
        self.error.clone().unwrap_or_default()
    }
}

/// Body of an approval submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approved_by: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawApprovalAck {
    #[serde(default)]
    wave_id: Option<String>,
    #[serde(default)]
    status: Option<WaveStatus>,
    #[serde(default)]
    approval_request_id: Option<String>,
    #[serde(default)]
    approved_by: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(flatten)]
    errors: ErrorFields,
}

/// Acknowledgement of an approval submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawApprovalAck")]
pub struct ApprovalAck {
    pub wave_id: Option<WaveHandle>,
    pub status: Option<WaveStatus>,
    pub approval_request_id: Option<String>,
    pub approved_by: Option<String>,
    pub note: Option<String>,
    pub error: Option<ErrorDetail>,
}

impl From<RawApprovalAck> for ApprovalAck {
    fn from(raw: RawApprovalAck) -> Self {
        Self {
            wave_id: non_empty(raw.wave_id).map(WaveHandle),
            status: raw.status,
            approval_request_id: non_empty(raw.approval_request_id),
            approved_by: raw.approved_by,
            note: raw.note,
            error: raw.errors.normalize(),
        }
    }
}

impl ApprovalAck {
    pub fn is_rejected(&self) -> bool {
        self.status == Some(WaveStatus::Failed)
    }
}

/// One step recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalRecord {
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub note: Option<String>,
    pub proposed_write_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmInvocation {
    pub provider: Option<String>,
    pub model_name: Option<String>,
    pub model_version: Option<String>,
}

/// Terminal evidence bundle for a completed Wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub integrity_status: String,
    #[serde(default)]
    pub policy_hash: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub events: Vec<AuditEvent>,
    #[serde(default)]
    pub wave_id: Option<WaveHandle>,
    #[serde(default)]
    pub approval: Option<ApprovalRecord>,
    #[serde(default)]
    pub llm_invocations: Vec<LlmInvocation>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

impl AuditRecord {
    pub fn is_valid(&self) -> bool {
        self.integrity_status == "VALID"
    }
}
