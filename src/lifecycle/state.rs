//! Lifecycle phase machine and approval ledger.
//!
//! # State Transitions
//! ```text
//! Starting → Polling
//! Polling → Polling | AwaitingApproval | Complete | Failed | TimedOut
//! AwaitingApproval → Polling | AwaitingApproval | Complete | Failed | TimedOut
//! ```
//! Complete, Failed and TimedOut are never left.

use std::collections::HashSet;
use std::fmt;

use crate::wave::WaveHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Starting,
    Polling,
    AwaitingApproval,
    Complete,
    Failed,
    TimedOut,
}

impl LifecyclePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecyclePhase::Starting => "starting",
            LifecyclePhase::Polling => "polling",
            LifecyclePhase::AwaitingApproval => "awaiting_approval",
            LifecyclePhase::Complete => "complete",
            LifecyclePhase::Failed => "failed",
            LifecyclePhase::TimedOut => "timeout",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LifecyclePhase::Complete | LifecyclePhase::Failed | LifecyclePhase::TimedOut
        )
    }

    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        use LifecyclePhase::{AwaitingApproval, Polling, Starting};

        match self {
            Starting => next == Polling,
            Polling | AwaitingApproval => next != Starting,
            _ => false,
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current phase of one lifecycle and logs transitions.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: LifecyclePhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Starting,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Move to `next`. Illegal transitions are logged and ignored.
    pub fn advance(&mut self, next: LifecyclePhase, handle: Option<&WaveHandle>) {
        if !self.phase.can_transition_to(next) {
            tracing::error!(from = %self.phase, to = %next, wave_id = ?handle, "Illegal lifecycle transition");
            return;
        }
        if self.phase != next {
            tracing::debug!(from = %self.phase, to = %next, wave_id = ?handle, "Lifecycle transition");
        }
        self.phase = next;
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Approval ids already submitted within one lifecycle.
#[derive(Debug, Default)]
pub struct ApprovalLedger {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl ApprovalLedger {
    pub fn contains(&self, approval_request_id: &str) -> bool {
        self.seen.contains(approval_request_id)
    }

    /// Record a successful submission. Returns false if already recorded.
    pub fn record(&mut self, approval_request_id: &str) -> bool {
        if !self.seen.insert(approval_request_id.to_string()) {
            return false;
        }
        self.order.push(approval_request_id.to_string());
        true
    }

    /// Submitted ids in submission order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn into_ids(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecyclePhase::*;

    #[test]
    fn test_transitions() {
        assert!(Starting.can_transition_to(Polling));
        assert!(!Starting.can_transition_to(Complete));
        assert!(Polling.can_transition_to(AwaitingApproval));
        assert!(AwaitingApproval.can_transition_to(Polling));
        assert!(Polling.can_transition_to(TimedOut));
        assert!(!Polling.can_transition_to(Starting));
        for terminal in [Complete, Failed, TimedOut] {
            assert!(terminal.is_terminal());
            assert!(!terminal.can_transition_to(Polling));
        }
    }

    #[test]
    fn test_tracker_ignores_illegal_transition() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Polling, None);
        tracker.advance(Complete, None);
        tracker.advance(Polling, None);
        assert_eq!(tracker.phase(), Complete);
    }

    #[test]
    fn test_ledger_dedupes() {
        let mut ledger = ApprovalLedger::default();
        assert!(ledger.record("a1"));
        assert!(!ledger.record("a1"));
        assert!(ledger.record("a2"));
        assert!(ledger.contains("a1"));
        assert_eq!(ledger.ids(), ["a1", "a2"]);
        assert_eq!(ledger.into_ids(), vec!["a1", "a2"]);
    }
}
