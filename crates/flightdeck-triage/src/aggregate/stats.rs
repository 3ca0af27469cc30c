//! Count tables over a collection.
//!
//! Every table lists all known keys, zero counts included, followed by an
//! `unknown` bucket for values the tracker sent that we did not recognize.
//! Consumers can index any known key without a missing-key check.

use std::collections::BTreeMap;

use flightdeck_core::{Collection, Priority, Severity, Status};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Serialize as DeriveSerialize;

use crate::classify::{Classifier, predicates};
use crate::workflow::WorkflowState;

pub const UNKNOWN_KEY: &str = "unknown";

/// Ordered key → count table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    /// Table with every key present at zero, in the given order.
    #[must_use]
    pub fn with_keys<'k>(keys: impl IntoIterator<Item = &'k str>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k.to_string(), 0)).collect(),
        }
    }

    /// Increment `key`, appending it when it is not yet present.
    pub fn bump(&mut self, key: &str) {
        if let Some((_, count)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            *count += 1;
        } else {
            self.entries.push((key.to_string(), 1));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, count)| (k.as_str(), *count))
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

const fn status_key(status: Status) -> &'static str {
    match status {
        Status::Unknown => UNKNOWN_KEY,
        known => known.as_str(),
    }
}

/// Counts by status, `unknown` last.
#[must_use]
pub fn by_status(tickets: &Collection<'_>) -> Tally {
    let mut tally = Tally::with_keys(
        Status::ORDERED
            .into_iter()
            .map(Status::as_str)
            .chain(std::iter::once(UNKNOWN_KEY)),
    );
    for ticket in tickets {
        tally.bump(status_key(ticket.status));
    }
    tally
}

/// Counts by priority, `unknown` last.
#[must_use]
pub fn by_priority(tickets: &Collection<'_>) -> Tally {
    let mut tally = Tally::with_keys(
        Priority::KNOWN
            .into_iter()
            .map(Priority::as_str)
            .chain(std::iter::once(UNKNOWN_KEY)),
    );
    for ticket in tickets {
        tally.bump(ticket.priority.as_str());
    }
    tally
}

/// Counts by severity, `unknown` last.
#[must_use]
pub fn by_severity(tickets: &Collection<'_>) -> Tally {
    let mut tally = Tally::with_keys(
        Severity::KNOWN
            .into_iter()
            .map(Severity::as_str)
            .chain(std::iter::once(UNKNOWN_KEY)),
    );
    for ticket in tickets {
        tally.bump(ticket.severity.as_str());
    }
    tally
}

/// Counts by derived workflow state, every state present.
#[must_use]
pub fn by_workflow(tickets: &Collection<'_>, classifier: &Classifier) -> Tally {
    let mut tally = Tally::with_keys(WorkflowState::ALL.into_iter().map(WorkflowState::as_str));
    for ticket in tickets {
        tally.bump(WorkflowState::of(ticket, classifier).as_str());
    }
    tally
}

/// Open tickets per theme. Unthemed tickets are not counted here.
#[must_use]
pub fn by_theme(tickets: &Collection<'_>) -> BTreeMap<String, usize> {
    let mut themes = BTreeMap::new();
    for ticket in tickets.iter().filter(|t| predicates::is_themed(t)) {
        if let Some(theme) = ticket.theme() {
            *themes.entry(theme.to_string()).or_insert(0) += 1;
        }
    }
    themes
}

/// All count tables for one collection.
#[derive(Debug, Clone, PartialEq, Eq, DeriveSerialize)]
pub struct Stats {
    pub total: usize,
    pub by_status: Tally,
    pub by_priority: Tally,
    pub by_severity: Tally,
    pub workflow: Tally,
    pub themes: BTreeMap<String, usize>,
}

impl Stats {
    #[must_use]
    pub fn compute(tickets: &Collection<'_>, classifier: &Classifier) -> Self {
        Self {
            total: tickets.len(),
            by_status: by_status(tickets),
            by_priority: by_priority(tickets),
            by_severity: by_severity(tickets),
            workflow: by_workflow(tickets, classifier),
            themes: by_theme(tickets),
        }
    }
}
