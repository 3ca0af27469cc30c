//! Status and flag transition log attached to a ticket.
//!
//! A snapshot only shows where a ticket is now. Edges such as "reopened" or
//! "returned from testing" need the log; the tracker export carries it as
//! `history`, oldest entry first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flag::{FlagKind, FlagSign};
use super::ticket::Status;

/// What changed in one transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "lowercase")]
pub enum Change {
    Status { from: Status, to: Status },
    Flag { kind: FlagKind, from: FlagSign, to: FlagSign },
}

/// One entry of the transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub who: String,
    #[serde(flatten)]
    pub change: Change,
}

impl Transition {
    /// `true` for a status change leaving the resolved band for an open status.
    #[must_use]
    pub fn is_reopen(&self) -> bool {
        matches!(
            self.change,
            Change::Status { from, to }
                if from.is_at_least(Status::Resolved) && to.is_below(Status::Resolved)
        )
    }

    /// `true` when this entry set the flag of `kind` to `sign`.
    #[must_use]
    pub fn sets_flag(&self, kind: FlagKind, sign: FlagSign) -> bool {
        matches!(self.change, Change::Flag { kind: k, to, .. } if k == kind && to == sign)
    }
}
