//! Lifecycle of a single collection run.
//!
//! ```text
//! Idle -> Fetching -> Filtering -> TargetReached -> Terminated
//!            ^            |     -> Exhausted     -> Terminated
//!            '------------'     -> Cancelled     -> Terminated
//! ```
//!
//! Cancellation is only observed at the top of the loop, i.e. from `Idle`
//! or after a completed `Filtering` step.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Fetching,
    Filtering,
    TargetReached,
    Exhausted,
    Cancelled,
    Terminated,
}

impl RunPhase {
    #[must_use]
    pub fn can_transition_to(self, next: RunPhase) -> bool {
        use RunPhase::{Cancelled, Exhausted, Fetching, Filtering, Idle, TargetReached, Terminated};

        matches!(
            (self, next),
            (Idle | Filtering, Fetching | Cancelled)
                | (Fetching, Filtering)
                | (Filtering, TargetReached | Exhausted)
                | (TargetReached | Exhausted | Cancelled, Terminated)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == RunPhase::Terminated
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::Fetching => "fetching",
            RunPhase::Filtering => "filtering",
            RunPhase::TargetReached => "target_reached",
            RunPhase::Exhausted => "exhausted",
            RunPhase::Cancelled => "cancelled",
            RunPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Tracks the current phase of a run and enforces legal transitions.
#[derive(Debug)]
pub(crate) struct PhaseTracker {
    phase: RunPhase,
}

impl PhaseTracker {
    pub(crate) fn new() -> Self {
        Self {
            phase: RunPhase::Idle,
        }
    }

    pub(crate) fn phase(&self) -> RunPhase {
        self.phase
    }

    pub(crate) fn transition(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal run phase transition {} -> {next}",
            self.phase
        );
        tracing::trace!(from = %self.phase, to = %next, "run phase transition");
        self.phase = next;
    }
}
