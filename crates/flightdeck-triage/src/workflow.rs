//! Ticket workflow as an explicit state machine.
//!
//! The tracker only stores a status and a set of flags. [`WorkflowState`]
//! folds both into one resting state:
//!
//! ```text
//! NEW -> OPEN_CONCEPT -> WIP <-> BLOCKED
//!                         |
//!                         v
//!                      RESOLVED -> TESTING_REQUESTED -> TESTING_GRANTED -> CLOSED
//!                                          |
//!                                          v
//!                                   TESTING_FAILED -> WIP
//! ```
//!
//! Reopening is an edge, not a state: any move from the resolved band back
//! to an open state. [`WorkflowState::is_reopen_edge`] detects it.
//!
//! [`WorkflowState::replay`] rebuilds the states a ticket went through from
//! its transition log, and [`WorkflowState::history_violations`] lists the
//! logged moves the diagram does not allow.

use std::fmt;

use flightdeck_core::{Change, ErrorCode, FlagKind, FlagSign, FlagState, Status, Ticket};
use serde::Serialize;

use crate::classify::{Classifier, predicates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    New,
    OpenConcept,
    Wip,
    Blocked,
    Resolved,
    TestingRequested,
    TestingGranted,
    TestingFailed,
    Closed,
}

impl WorkflowState {
    pub const ALL: [Self; 9] = [
        Self::New,
        Self::OpenConcept,
        Self::Wip,
        Self::Blocked,
        Self::Resolved,
        Self::TestingRequested,
        Self::TestingGranted,
        Self::TestingFailed,
        Self::Closed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::OpenConcept => "open_concept",
            Self::Wip => "wip",
            Self::Blocked => "blocked",
            Self::Resolved => "resolved",
            Self::TestingRequested => "testing_requested",
            Self::TestingGranted => "testing_granted",
            Self::TestingFailed => "testing_failed",
            Self::Closed => "closed",
        }
    }

    /// Derive the resting state of a ticket.
    ///
    /// Tickets with an unrecognized status are treated as [`WorkflowState::New`].
    #[must_use]
    pub fn of(ticket: &Ticket, classifier: &Classifier) -> Self {
        if ticket.status == Status::Closed {
            return Self::Closed;
        }

        if predicates::is_fixed(ticket) {
            if predicates::is_failed(ticket) {
                return Self::TestingFailed;
            }
            return match ticket.flag(FlagKind::Testing).sign() {
                FlagSign::Requested => Self::TestingRequested,
                FlagSign::Granted => Self::TestingGranted,
                FlagSign::Unset | FlagSign::Denied => Self::Resolved,
            };
        }

        if !predicates::is_open(ticket) {
            return Self::New;
        }
        if predicates::is_waiting(ticket) {
            Self::Blocked
        } else if classifier.is_open_concept(ticket) {
            Self::OpenConcept
        } else if ticket.status.is_below(Status::Assigned) {
            Self::New
        } else {
            Self::Wip
        }
    }

    /// States at or beyond `RESOLVED`.
    #[must_use]
    pub const fn is_resolved_band(self) -> bool {
        matches!(
            self,
            Self::Resolved
                | Self::TestingRequested
                | Self::TestingGranted
                | Self::TestingFailed
                | Self::Closed
        )
    }

    /// Moving from the resolved band back to an open state.
    #[must_use]
    pub const fn is_reopen_edge(from: Self, to: Self) -> bool {
        from.is_resolved_band() && !to.is_resolved_band()
    }

    /// Validate a move from `self` to `target`.
    ///
    /// Forward edges follow the diagram above. Every reopen edge is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for no-op moves and for edges the
    /// workflow does not have.
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let forward = matches!(
            (self, target),
            (Self::New, Self::OpenConcept | Self::Wip)
                | (Self::OpenConcept, Self::Wip)
                | (Self::Wip, Self::Blocked | Self::Resolved)
                | (Self::Blocked, Self::Wip)
                | (Self::Resolved, Self::TestingRequested | Self::Closed)
                | (Self::TestingRequested, Self::TestingGranted | Self::TestingFailed)
                | (Self::TestingGranted, Self::Closed)
        );

        if forward || Self::is_reopen_edge(self, target) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by workflow rules",
            })
        }
    }

    /// States the ticket passed through, oldest first, ending with the state
    /// after its last logged change.
    ///
    /// The log is rewound to find the starting status and flags, then
    /// replayed one entry at a time. Entries that leave the state unchanged
    /// do not add a step. A ticket without a log yields its current state.
    #[must_use]
    pub fn replay(ticket: &Ticket, classifier: &Classifier) -> Vec<Self> {
        let mut step = ticket.clone();
        step.history.clear();
        for entry in ticket.history.iter().rev() {
            match entry.change {
                Change::Status { from, .. } => step.status = from,
                Change::Flag { kind, from, .. } => step.flags.set(kind, sign_state(from)),
            }
        }

        let mut states = vec![Self::of(&step, classifier)];
        for entry in &ticket.history {
            match entry.change {
                Change::Status { to, .. } => step.status = to,
                Change::Flag { kind, to, .. } => step.flags.set(kind, sign_state(to)),
            }
            step.history.push(entry.clone());
            let state = Self::of(&step, classifier);
            if states.last() != Some(&state) {
                states.push(state);
            }
        }
        states
    }

    /// Consecutive replayed states that [`WorkflowState::can_transition_to`]
    /// rejects.
    #[must_use]
    pub fn history_violations(ticket: &Ticket, classifier: &Classifier) -> Vec<InvalidTransition> {
        Self::replay(ticket, classifier)
            .windows(2)
            .filter_map(|pair| pair[0].can_transition_to(pair[1]).err())
            .collect()
    }
}

const fn sign_state(sign: FlagSign) -> FlagState {
    match sign {
        FlagSign::Unset => FlagState::Unset,
        FlagSign::Requested => FlagState::Requested { by: None },
        FlagSign::Granted => FlagState::Granted,
        FlagSign::Denied => FlagState::Denied,
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a workflow transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: WorkflowState,
    pub to: WorkflowState,
    pub reason: &'static str,
}

impl InvalidTransition {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidStateTransition
    }
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move {} -> {}: {}", self.from, self.to, self.reason)
    }
}

impl std::error::Error for InvalidTransition {}
