use std::collections::HashSet;

use flightdeck_core::config::BoardConfig;
use flightdeck_core::{Collection, FlagKind, FlagSign, Status, Ticket};

use super::fixed::FixTarget;
use super::predicates;

/// Project-aware predicates.
///
/// Holds the normalized board settings so each call is a set lookup rather
/// than a rescan of the config lists.
#[derive(Debug, Clone)]
pub struct Classifier {
    unassigned: HashSet<String>,
    trunk_names: Vec<String>,
    branch_prefixes: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl Classifier {
    #[must_use]
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            unassigned: config.unassigned_logins.iter().map(|l| normalize(l)).collect(),
            trunk_names: config.trunk_names.iter().map(|n| normalize(n)).collect(),
            branch_prefixes: config
                .branch_prefixes
                .iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Nobody owns the ticket: placeholder assignee or not yet accepted.
    #[must_use]
    pub fn is_unassigned(&self, ticket: &Ticket) -> bool {
        self.unassigned.contains(&normalize(&ticket.assignee))
            || ticket.status.is_below(Status::Assigned)
    }

    /// Actively worked by a real assignee and not blocked.
    #[must_use]
    pub fn is_in_progress(&self, ticket: &Ticket) -> bool {
        matches!(ticket.status, Status::Assigned | Status::Reopened)
            && !self.is_unassigned(ticket)
            && !predicates::is_waiting(ticket)
            && !predicates::is_container(ticket)
    }

    /// Open, unowned, unestimated real work.
    #[must_use]
    pub fn is_open_concept(&self, ticket: &Ticket) -> bool {
        predicates::is_open(ticket)
            && !predicates::is_container(ticket)
            && !predicates::is_administrative(ticket)
            && self.is_unassigned(ticket)
            && ticket.estimate.is_none_or(|hours| hours <= 0.0)
    }

    /// Fix target of a resolved ticket; `None` while the ticket is not fixed.
    #[must_use]
    pub fn fix_target(&self, ticket: &Ticket) -> Option<FixTarget> {
        predicates::is_fixed(ticket).then(|| {
            FixTarget::from_branch(
                ticket.target_branch.as_deref(),
                &self.trunk_names,
                &self.branch_prefixes,
            )
        })
    }

    #[must_use]
    pub fn is_fixed_in_branch(&self, ticket: &Ticket) -> bool {
        self.fix_target(ticket) == Some(FixTarget::Branch)
    }

    #[must_use]
    pub fn is_fixed_in_trunk(&self, ticket: &Ticket) -> bool {
        self.fix_target(ticket) == Some(FixTarget::Trunk)
    }

    #[must_use]
    pub fn is_fixed_unknown(&self, ticket: &Ticket) -> bool {
        self.fix_target(ticket) == Some(FixTarget::Unknown)
    }

    #[must_use]
    pub fn in_progress<'a>(&self, tickets: &Collection<'a>) -> Collection<'a> {
        tickets.filter(|t| self.is_in_progress(t))
    }

    #[must_use]
    pub fn fixed_in<'a>(&self, tickets: &Collection<'a>, target: FixTarget) -> Collection<'a> {
        tickets.filter(|t| self.fix_target(t) == Some(target))
    }
}

/// Every ticket whose flag of `kind` carries exactly `sign`.
#[must_use]
pub fn bugs_with_flag<'a>(
    tickets: &Collection<'a>,
    kind: FlagKind,
    sign: FlagSign,
) -> Collection<'a> {
    tickets.filter(|t| t.has_flag(kind, sign))
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}
