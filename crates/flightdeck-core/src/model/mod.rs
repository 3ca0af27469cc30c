//! Ticket records as exported by the upstream tracker.
//!
//! - [`ticket`]: the [`Ticket`](ticket::Ticket) entity and its enumerations.
//! - [`flag`]: sign-off flags keyed by [`FlagKind`](flag::FlagKind).
//! - [`history`]: the status/flag transition log attached to a ticket.

pub mod flag;
pub mod history;
pub mod ticket;

/// Lowercase and trim a tracker-supplied enum string.
pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
