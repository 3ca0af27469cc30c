//! Complete, immutable ticket snapshot a classification pass runs over.
//!
//! The upstream tracker delivers the whole project at once; a pass never
//! starts on a partial snapshot. [`Snapshot::content_hash`] fingerprints the
//! canonical JSON of the ticket list with BLAKE3 so callers can tell two
//! fetches apart (or prove they are identical) without diffing them.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::collection::Collection;
use crate::error::ModelError;
use crate::model::ticket::{Ticket, TicketId};

/// `{ "tickets": [...] }` export envelope.
#[derive(Deserialize)]
struct Wrapped {
    tickets: Vec<Ticket>,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    tickets: Vec<Ticket>,
    index: HashMap<TicketId, usize>,
}

impl Snapshot {
    /// Build a snapshot, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateTicket`] when two tickets share an id.
    pub fn new(tickets: Vec<Ticket>) -> Result<Self, ModelError> {
        let mut index = HashMap::with_capacity(tickets.len());
        for (pos, ticket) in tickets.iter().enumerate() {
            if index.insert(ticket.id.clone(), pos).is_some() {
                return Err(ModelError::DuplicateTicket(ticket.id.clone()));
            }
        }

        let snapshot = Self { tickets, index };
        let dangling = snapshot.dangling_dependencies();
        if dangling > 0 {
            warn!(dangling, "dependencies reference tickets outside the snapshot");
        }
        Ok(snapshot)
    }

    /// Parse a tracker export: either `[...]` or `{ "tickets": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] for malformed JSON or records missing
    /// required fields, and [`ModelError::DuplicateTicket`] for repeated ids.
    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        // The top-level shape picks the schema so field errors keep their position.
        let tickets = if raw.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Ticket>>(raw)?
        } else {
            serde_json::from_str::<Wrapped>(raw)?.tickets
        };
        debug!(tickets = tickets.len(), "snapshot parsed");
        Self::new(tickets)
    }

    /// Like [`Snapshot::from_json_str`], reading from any [`Read`].
    ///
    /// # Errors
    ///
    /// See [`Snapshot::from_json_str`]; I/O failures map to [`ModelError::Io`].
    #[instrument(skip(reader))]
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ModelError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.index.get(id).map(|&pos| &self.tickets[pos])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Every ticket, in source order.
    #[must_use]
    pub fn all(&self) -> Collection<'_> {
        self.tickets.iter().collect()
    }

    /// Number of dependency references that point outside the snapshot.
    #[must_use]
    pub fn dangling_dependencies(&self) -> usize {
        self.tickets
            .iter()
            .flat_map(|t| &t.dependencies)
            .filter(|id| !self.index.contains_key(*id))
            .count()
    }

    /// `blake3:<hex>` fingerprint of the canonical ticket list.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for ticket in &self.tickets {
            // Serializing a derived struct into a Vec cannot fail.
            let bytes = serde_json::to_vec(ticket).unwrap_or_default();
            hasher.update(&bytes);
            hasher.update(b"\n");
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticket::Status;

    const EXPORT: &str = r#"{"tickets": [
        {"id": 1, "status": "NEW", "assignee": "alice", "depends_on": [2, 99],
         "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-01T09:00:00Z"},
        {"id": 2, "status": "RESOLVED", "assignee": "bob",
         "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-02T09:00:00Z"}
    ]}"#;

    #[test]
    fn parses_wrapped_and_bare_exports() {
        let wrapped = Snapshot::from_json_str(EXPORT).unwrap();
        assert_eq!(wrapped.len(), 2);

        let bare_json = serde_json::to_string(wrapped.tickets()).unwrap();
        let bare = Snapshot::from_json_str(&bare_json).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare.get(&TicketId::Num(2)).map(|t| t.status), Some(Status::Resolved));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Snapshot::new(vec![
            Ticket::new(5, Status::New, "alice"),
            Ticket::new(5, Status::Closed, "bob"),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateTicket(TicketId::Num(5))));
    }

    #[test]
    fn dangling_dependencies_are_counted_not_rejected() {
        let snapshot = Snapshot::from_json_str(EXPORT).unwrap();
        assert_eq!(snapshot.dangling_dependencies(), 1);
    }

    #[test]
    fn content_hash_is_stable_and_sensitive() {
        let a = Snapshot::from_json_str(EXPORT).unwrap();
        let b = Snapshot::from_json_str(EXPORT).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
        assert!(a.content_hash().starts_with("blake3:"));

        let mut tickets = a.tickets().to_vec();
        tickets[0].status = Status::Assigned;
        let c = Snapshot::new(tickets).unwrap();
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = Snapshot::from_json_str("{\"tickets\": 3}").unwrap_err();
        assert!(matches!(err, ModelError::Parse(_)));
    }

    #[test]
    fn tracker_keys_are_ticket_ids() {
        let snapshot = Snapshot::from_json_str(
            r#"[
            {"id": "PROJ-7", "status": "NEW", "assignee": "alice", "depends_on": ["PROJ-8", 3],
             "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-01T09:00:00Z"},
            {"id": 3, "status": "NEW", "assignee": "bob",
             "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-01T09:00:00Z"}
        ]"#,
        )
        .unwrap();
        let keyed = snapshot.get(&TicketId::Key("PROJ-7".to_string())).unwrap();
        assert_eq!(keyed.assignee, "alice");
        assert_eq!(snapshot.dangling_dependencies(), 1);
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        for raw in [
            r#"[{"id": 1, "status": "NEW", "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-01T09:00:00Z"}]"#,
            r#"{"tickets": [{"id": 1, "status": "NEW", "created_at": "2026-10-01T09:00:00Z", "changed_at": "2026-10-01T09:00:00Z"}]}"#,
        ] {
            let err = Snapshot::from_json_str(raw).unwrap_err();
            assert!(matches!(err, ModelError::Parse(_)));
            assert!(err.to_string().contains("assignee"), "{err}");
        }
    }
}
