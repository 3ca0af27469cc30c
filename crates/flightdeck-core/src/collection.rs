//! Order-preserving, id-keyed ticket collections.
//!
//! # Overview
//!
//! A [`Collection`] is the result of one classification ("waiting",
//! "fixed without testing", ...). It borrows tickets from a
//! [`Snapshot`](crate::snapshot::Snapshot) and keys membership by
//! [`TicketId`], never by reference identity, so collections built from
//! independently constructed snapshots can still be subtracted from each
//! other.
//!
//! Insertion order follows source order. Inserting an id that is already
//! present is a no-op: the first occurrence wins.
//!
//! Serializes as a JSON object `{ "<id>": <ticket>, ... }` in insertion
//! order.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::ticket::{Ticket, TicketId};

#[derive(Debug, Clone, Default)]
pub struct Collection<'a> {
    items: Vec<&'a Ticket>,
    ids: HashSet<&'a TicketId>,
}

impl<'a> Collection<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a ticket; returns `false` when its id was already present.
    pub fn insert(&mut self, ticket: &'a Ticket) -> bool {
        if !self.ids.insert(&ticket.id) {
            return false;
        }
        self.items.push(ticket);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &TicketId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn get(&self, id: &TicketId) -> Option<&'a Ticket> {
        if !self.contains(id) {
            return None;
        }
        self.items.iter().copied().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Ticket> + '_ {
        self.items.iter().copied()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &'a TicketId> + '_ {
        self.items.iter().map(|t| &t.id)
    }

    /// New collection holding the members that satisfy `keep`, order preserved.
    #[must_use]
    pub fn filter(&self, mut keep: impl FnMut(&Ticket) -> bool) -> Self {
        self.iter().filter(|t| keep(t)).collect()
    }
}

impl<'a> FromIterator<&'a Ticket> for Collection<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Ticket>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<'a> Extend<&'a Ticket> for Collection<'a> {
    fn extend<I: IntoIterator<Item = &'a Ticket>>(&mut self, iter: I) {
        for ticket in iter {
            self.insert(ticket);
        }
    }
}

impl<'a, 'c> IntoIterator for &'c Collection<'a> {
    type Item = &'a Ticket;
    type IntoIter = std::iter::Copied<std::slice::Iter<'c, &'a Ticket>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

/// Equal when both hold equal tickets in the same order.
impl PartialEq for Collection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.id == b.id && a == b)
    }
}

impl Serialize for Collection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for ticket in &self.items {
            map.serialize_entry(&ticket.id.to_string(), *ticket)?;
        }
        map.end()
    }
}
