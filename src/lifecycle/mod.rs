//! Wave lifecycle subsystem.
//!
//! # Flow
//! ```text
//! start ──▶ poll status ──▶ running ──────────────┐
//!               ▲          needs_approval ─▶ approve (once per id)
//!               │          complete ─▶ audit ─▶ return
//!               │          failed ─▶ RemoteFailure
//!               └──── jittered sleep ◀────────────┘
//! deadline checked before every poll ─▶ Timeout
//! ```
//!
//! # Concurrency
//! - One sequential chain of awaits per Wave; never two calls in flight for the same Wave
//! - Independent lifecycles share nothing mutable
//! - No external cancellation; a timed-out Wave is abandoned, not cancelled remotely

pub mod cadence;
pub mod orchestrator;
pub mod state;

pub use cadence::PollCadence;
pub use orchestrator::{LifecycleOutcome, WaveOrchestrator};
pub use state::{ApprovalLedger, LifecyclePhase};
