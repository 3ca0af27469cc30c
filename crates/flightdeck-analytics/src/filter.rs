//! Field filters narrowing the plotted population.
//!
//! A filter is written `field=value` (the field's default comparator) or
//! with an explicit operator: `field==value`, `field>=value`,
//! `field<=value`. Filters combine with AND, applied in order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FieldError;
use crate::field::{Comparator, Field};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub field: Field,
    pub comparator: Comparator,
    /// Raw reference value; empty means the filter is inactive.
    pub reference: String,
}

impl Filter {
    /// Filter with the field's default comparator.
    #[must_use]
    pub fn new(field: Field, reference: impl Into<String>) -> Self {
        Self {
            field,
            comparator: field.default_comparator(),
            reference: reference.into(),
        }
    }

    /// Filter with an explicit comparator.
    ///
    /// # Errors
    ///
    /// [`FieldError::MalformedFilter`] when an ordering comparator is used
    /// on a categorical field.
    pub fn with_comparator(
        field: Field,
        comparator: Comparator,
        reference: impl Into<String>,
    ) -> Result<Self, FieldError> {
        let filter = Self {
            field,
            comparator,
            reference: reference.into(),
        };
        filter.validate()?;
        Ok(filter)
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.comparator == Comparator::Equals || !self.is_active() {
            return Ok(());
        }
        if !self.field.is_numeric() {
            return Err(FieldError::MalformedFilter(self.to_string()));
        }
        Ok(())
    }

    /// Whether the filter constrains anything at all.
    ///
    /// An empty reference is inactive, as is a non-numeric reference under
    /// an ordering comparator.
    #[must_use]
    pub fn is_active(&self) -> bool {
        let reference = self.reference.trim();
        if reference.is_empty() {
            return false;
        }
        self.comparator == Comparator::Equals || parse_number(reference).is_some()
    }

    /// Whether `record` passes. Inactive filters pass everything.
    ///
    /// Ordering comparators read the own numeric value; a record without
    /// one fails. Equality compares numerically when both sides are
    /// numbers and as trimmed text otherwise.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }
        let reference = self.reference.trim();
        match self.comparator {
            Comparator::Equals => {
                let text = record.text(self.field);
                match (parse_number(&text), parse_number(reference)) {
                    (Some(a), Some(b)) => a == b,
                    _ => text.trim() == reference,
                }
            }
            Comparator::AtLeast => ordered(record, self.field, reference, |v, r| v >= r),
            Comparator::AtMost => ordered(record, self.field, reference, |v, r| v <= r),
        }
    }
}

fn ordered(record: &Record, field: Field, reference: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (record.number(field), parse_number(reference)) {
        (Some(value), Some(reference)) => cmp(value, reference),
        _ => false,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.comparator.symbol(), self.reference)
    }
}

impl FromStr for Filter {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const OPERATORS: [(&str, Option<Comparator>); 4] = [
            (">=", Some(Comparator::AtLeast)),
            ("<=", Some(Comparator::AtMost)),
            ("==", Some(Comparator::Equals)),
            ("=", None),
        ];

        // Split at the first operator; at one position the longer spelling wins.
        let (name, comparator, reference) = s
            .char_indices()
            .find_map(|(at, _)| {
                let rest = &s[at..];
                OPERATORS
                    .iter()
                    .find(|(op, _)| rest.starts_with(op))
                    .map(|(op, cmp)| (&s[..at], *cmp, &rest[op.len()..]))
            })
            .ok_or_else(|| FieldError::MalformedFilter(s.to_string()))?;

        if name.trim().is_empty() {
            return Err(FieldError::MalformedFilter(s.to_string()));
        }
        let field: Field = name.parse()?;
        let comparator = comparator.unwrap_or_else(|| field.default_comparator());
        Self::with_comparator(field, comparator, reference.trim())
    }
}

/// Records passing every filter, in input order.
#[must_use]
pub fn apply_filters<'r>(records: &[&'r Record], filters: &[Filter]) -> Vec<&'r Record> {
    filters
        .iter()
        .filter(|f| f.is_active())
        .fold(records.to_vec(), |working, filter| {
            working.into_iter().filter(|r| filter.matches(r)).collect()
        })
}
