//! Flattened ticket view the projector works on.

use std::collections::HashMap;

use flightdeck_core::{Status, Ticket, TicketId};
use serde::Serialize;

use crate::field::Field;

/// The plottable slice of one ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: TicketId,
    pub summary: String,
    pub assignee: String,
    pub status: Status,
    pub revenue: Option<f64>,
    pub complexity: Option<f64>,
    pub dependency: Option<f64>,
    pub risk: Option<f64>,
    pub depends: Vec<TicketId>,
}

impl From<&Ticket> for Record {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.clone(),
            summary: ticket.summary.clone(),
            assignee: ticket.assignee.clone(),
            status: ticket.status,
            revenue: ticket
                .revenue()
                .and_then(|raw| raw.parse::<f64>().ok())
                .filter(|v| v.is_finite()),
            complexity: ticket.ratings.complexity,
            dependency: ticket.ratings.dependency,
            risk: ticket.ratings.risk,
            depends: ticket.dependencies.clone(),
        }
    }
}

impl Record {
    /// Numeric value of `field`; `None` when missing or categorical.
    #[must_use]
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Revenue => self.revenue,
            Field::Complexity => self.complexity,
            Field::Dependency => self.dependency,
            Field::Risk => self.risk,
            Field::Summary | Field::Assignee | Field::Status => None,
        }
        .filter(|v| v.is_finite())
    }

    /// Own value of `field`, anything non-numeric counting as 0.
    #[must_use]
    pub fn value(&self, field: Field) -> f64 {
        self.number(field).unwrap_or(0.0)
    }

    /// Display form of `field`: empty for a missing number.
    #[must_use]
    pub fn text(&self, field: Field) -> String {
        match field {
            Field::Summary => self.summary.clone(),
            Field::Assignee => self.assignee.clone(),
            Field::Status => self.status.as_str().to_string(),
            numeric => self
                .number(numeric)
                .map_or_else(String::new, |v| v.to_string()),
        }
    }
}

/// Records addressable by id, for dependency lookups.
#[derive(Debug, Clone)]
pub struct WorkingSet<'a> {
    by_id: HashMap<&'a TicketId, &'a Record>,
}

impl<'a> WorkingSet<'a> {
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = &'a Record>) -> Self {
        Self {
            by_id: records.into_iter().map(|r| (&r.id, r)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &TicketId) -> Option<&'a Record> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Value of `field` for `record`, optionally adding its direct
    /// dependencies.
    ///
    /// Propagation is one level only: a dependency's own dependencies are
    /// never visited, so cyclic dependency graphs terminate. Dependencies
    /// outside the working set contribute 0.
    #[must_use]
    pub fn value_with_dependencies(
        &self,
        record: &Record,
        field: Field,
        include_dependencies: bool,
    ) -> f64 {
        let own = record.value(field);
        if !include_dependencies {
            return own;
        }
        own + record
            .depends
            .iter()
            .filter_map(|id| self.get(id))
            .map(|dep| dep.value(field))
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, revenue: Option<f64>, depends: &[u64]) -> Record {
        Record {
            id: TicketId::Num(id),
            summary: format!("ticket {id}"),
            assignee: "alice".into(),
            status: Status::New,
            revenue,
            complexity: None,
            dependency: None,
            risk: None,
            depends: depends.iter().copied().map(TicketId::Num).collect(),
        }
    }

    #[test]
    fn adds_direct_dependencies_present_in_set() {
        let t = record(1, Some(5.0), &[2, 3]);
        let d1 = record(2, Some(3.0), &[]);
        let set = WorkingSet::new([&t, &d1]);

        assert!((set.value_with_dependencies(&t, Field::Revenue, true) - 8.0).abs() < f64::EPSILON);
        assert!((set.value_with_dependencies(&t, Field::Revenue, false) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cycles_do_not_recurse() {
        let a = record(1, Some(1.0), &[2]);
        let b = record(2, Some(10.0), &[1]);
        let set = WorkingSet::new([&a, &b]);
        assert!((set.value_with_dependencies(&a, Field::Revenue, true) - 11.0).abs() < f64::EPSILON);
        assert!((set.value_with_dependencies(&b, Field::Revenue, true) - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_numeric_values_count_as_zero() {
        let mut ticket = Ticket::new(7, Status::New, "bob");
        ticket.revenue = Some("lots".into());
        let r = Record::from(&ticket);
        assert_eq!(r.revenue, None);
        assert!(r.value(Field::Revenue).abs() < f64::EPSILON);
        assert!(r.value(Field::Summary).abs() < f64::EPSILON);
        assert_eq!(r.text(Field::Revenue), "");
        assert_eq!(r.text(Field::Status), "NEW");
    }

    #[test]
    fn revenue_tag_parses_from_ticket() {
        let mut ticket = Ticket::new(7, Status::New, "bob");
        ticket.revenue = Some(" 4.5 ".into());
        ticket.ratings.risk = Some(2.0);
        let r = Record::from(&ticket);
        assert_eq!(r.revenue, Some(4.5));
        assert_eq!(r.text(Field::Risk), "2");
    }
}
