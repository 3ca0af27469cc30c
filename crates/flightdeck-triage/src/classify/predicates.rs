//! Configuration-free ticket predicates.
//!
//! Every function here reads one ticket and nothing else. Predicates that
//! depend on project settings (who counts as "nobody", which branch names
//! mean trunk) live on [`Classifier`](super::Classifier).

use chrono::NaiveDate;
use flightdeck_core::{FlagKind, FlagSign, Kind, Status, Ticket};

/// Status is known and below `RESOLVED`.
#[must_use]
pub fn is_open(ticket: &Ticket) -> bool {
    ticket.status.is_below(Status::Resolved)
}

/// Status has reached the terminal `CLOSED`.
#[must_use]
pub fn is_closed(ticket: &Ticket) -> bool {
    ticket.is_status_at_least(Status::Closed)
}

/// Status is `RESOLVED` or later.
#[must_use]
pub fn is_fixed(ticket: &Ticket) -> bool {
    ticket.is_status_at_least(Status::Resolved)
}

#[must_use]
pub fn is_administrative(ticket: &Ticket) -> bool {
    ticket.is_type(Kind::Administrative)
}

#[must_use]
pub fn is_container(ticket: &Ticket) -> bool {
    ticket.is_type(Kind::Container)
}

/// Open, never picked up, and real work (not organisational, not an umbrella).
#[must_use]
pub fn is_unworked(ticket: &Ticket) -> bool {
    ticket.status.is_below(Status::Assigned)
        && !is_administrative(ticket)
        && !is_container(ticket)
}

/// Ticket belongs to an umbrella ticket.
#[must_use]
pub const fn has_container(ticket: &Ticket) -> bool {
    ticket.container.is_some()
}

/// Currently `REOPENED`, or the log shows the status regressing from
/// `RESOLVED`-or-later back below `RESOLVED`.
#[must_use]
pub fn is_reopened(ticket: &Ticket) -> bool {
    ticket.status == Status::Reopened
        || ticket.history.iter().any(flightdeck_core::Transition::is_reopen)
}

/// Returned from testing without sign-off.
///
/// The TESTING flag must be requested or denied (present, not granted) and
/// there must be a rejection marker: either the flag is denied right now or
/// the log shows it being denied earlier.
#[must_use]
pub fn is_failed(ticket: &Ticket) -> bool {
    match ticket.flag(FlagKind::Testing).sign() {
        FlagSign::Denied => true,
        FlagSign::Requested => ticket
            .history
            .iter()
            .any(|t| t.sets_flag(FlagKind::Testing, FlagSign::Denied)),
        FlagSign::Unset | FlagSign::Granted => false,
    }
}

/// Blocked pending another party: in clarification or a comment requested.
#[must_use]
pub fn is_blocked_on_party(ticket: &Ticket) -> bool {
    ticket.status == Status::Clarification
        || ticket.has_flag(FlagKind::Comment, FlagSign::Requested)
}

/// Open and blocked pending another party.
#[must_use]
pub fn is_waiting(ticket: &Ticket) -> bool {
    is_open(ticket) && is_blocked_on_party(ticket)
}

/// MERGE flag requested. Never true together with [`is_merged`].
#[must_use]
pub fn is_mergeable(ticket: &Ticket) -> bool {
    ticket.has_flag(FlagKind::Merge, FlagSign::Requested)
}

/// MERGE flag granted.
#[must_use]
pub fn is_merged(ticket: &Ticket) -> bool {
    ticket.has_flag(FlagKind::Merge, FlagSign::Granted)
}

/// Open and tagged with a theme.
#[must_use]
pub fn is_themed(ticket: &Ticket) -> bool {
    is_open(ticket) && ticket.theme().is_some()
}

/// Open and without a theme.
#[must_use]
pub fn is_unthemed(ticket: &Ticket) -> bool {
    is_open(ticket) && ticket.theme().is_none()
}

#[must_use]
pub const fn is_on_watchlist(ticket: &Ticket) -> bool {
    ticket.watched
}

/// Last change happened on `day` (UTC).
#[must_use]
pub fn is_changed_on(ticket: &Ticket, day: NaiveDate) -> bool {
    ticket.changed_at.date_naive() == day
}
