#![allow(dead_code)]

use flightdeck_core::{FlagKind, FlagState, Flags, Kind, Status, Ticket};
use proptest::prelude::*;

pub fn arb_status() -> impl Strategy<Value = Status> + Clone {
    prop_oneof![
        Just(Status::Unconfirmed),
        Just(Status::New),
        Just(Status::Assigned),
        Just(Status::Reopened),
        Just(Status::Clarification),
        Just(Status::Resolved),
        Just(Status::Verified),
        Just(Status::Closed),
        Just(Status::Unknown),
    ]
}

pub fn arb_kind() -> impl Strategy<Value = Kind> + Clone {
    prop_oneof![
        Just(Kind::Bug),
        Just(Kind::Feature),
        Just(Kind::Administrative),
        Just(Kind::Container),
    ]
}

pub fn arb_flag_state() -> impl Strategy<Value = FlagState> + Clone {
    prop_oneof![
        Just(FlagState::Unset),
        Just(FlagState::Requested { by: None }),
        Just(FlagState::Requested {
            by: Some("qa".to_string())
        }),
        Just(FlagState::Granted),
        Just(FlagState::Denied),
    ]
}

pub fn arb_flags() -> impl Strategy<Value = Flags> + Clone {
    prop::collection::vec(arb_flag_state(), FlagKind::COUNT).prop_map(|states| {
        FlagKind::ALL
            .into_iter()
            .zip(states)
            .fold(Flags::default(), |flags, (kind, state)| flags.with(kind, state))
    })
}

pub fn arb_branch() -> impl Strategy<Value = Option<String>> + Clone {
    prop_oneof![
        Just(None),
        Just(Some("trunk".to_string())),
        Just(Some("Main".to_string())),
        Just(Some("release-2.1".to_string())),
        Just(Some("hotfix/login".to_string())),
        Just(Some("feature-x".to_string())),
        Just(Some(String::new())),
    ]
}

pub fn arb_assignee() -> impl Strategy<Value = String> + Clone {
    prop_oneof![
        Just("alice".to_string()),
        Just("bob".to_string()),
        Just("carol".to_string()),
        Just("nobody".to_string()),
        Just(String::new()),
    ]
}

/// Ticket with the given id and random classification-relevant fields.
pub fn arb_ticket(id: u64) -> impl Strategy<Value = Ticket> {
    (
        arb_status(),
        arb_kind(),
        arb_flags(),
        arb_assignee(),
        arb_branch(),
        prop::option::of(prop_oneof![Just("checkout"), Just("search")]),
        prop::option::of(0.0f64..16.0),
    )
        .prop_map(move |(status, kind, flags, assignee, branch, theme, estimate)| {
            let mut ticket = Ticket::new(id, status, assignee);
            ticket.kind = kind;
            ticket.flags = flags;
            ticket.target_branch = branch;
            ticket.theme = theme.map(ToString::to_string);
            ticket.estimate = estimate;
            ticket
        })
}

/// Up to `max` tickets with distinct ids `1..=n`.
pub fn arb_tickets(max: usize) -> impl Strategy<Value = Vec<Ticket>> {
    (0..=max).prop_flat_map(|n| {
        (1..=n as u64)
            .map(arb_ticket)
            .collect::<Vec<_>>()
    })
}
