//! RPC bindings subsystem.
//!
//! # Operations
//! ```text
//! start   POST /api/waves/run                    → StartAck { wave_id, .. }
//! status  GET  /api/waves/{wave_id}/status       → StatusSnapshot
//! approve POST /api/approvals/{approval_id}      → ApprovalAck
//! audit   GET  /api/waves/{wave_id}/audit/export → AuditRecord
//! ```
//!
//! # Design Decisions
//! - Missing identifiers fail locally with `WaveError::Validation`; no request is sent
//! - Undecodable success bodies are protocol errors, never retried
//! - `WaveApi` is the seam the orchestrator is generic over

pub mod api;
pub mod client;

pub use api::WaveApi;
pub use client::WaveClient;
