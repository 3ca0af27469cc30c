//! Per-metric summaries used to size the plot axes.
//!
//! Padding widens the domain on both ends whatever the sign:
//!
//! | raw          | padded with factor `p` |
//! |--------------|------------------------|
//! | `max > 0`    | `max * p`              |
//! | `max <= 0`   | `max / p`              |
//! | `min > 0`    | `min / p`              |
//! | `min <= 0`   | `min * p`              |
//!
//! `avg` and `unique` are never padded.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::BoundsError;
use crate::field::Field;
use crate::record::Record;

/// Summary of one numeric field over a non-empty set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    /// Mean over every record, missing values counting as 0.
    pub avg: f64,
    /// Distinct values, ascending.
    pub unique: Vec<f64>,
}

impl Bounds {
    /// Summarize already-extracted values.
    ///
    /// # Errors
    ///
    /// [`BoundsError::Empty`] for no values, [`BoundsError::InvalidPadding`]
    /// for a factor that is not positive and finite.
    pub fn from_values(values: &[f64], padding: f64) -> Result<Self, BoundsError> {
        if !(padding.is_finite() && padding > 0.0) {
            return Err(BoundsError::InvalidPadding(padding));
        }
        let Some(&first) = values.first() else {
            return Err(BoundsError::Empty);
        };

        let (mut min, mut max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let avg = values.iter().sum::<f64>() / count_as_f64(values.len());

        let mut unique = values.to_vec();
        unique.sort_by(f64::total_cmp);
        unique.dedup();

        if max > 0.0 {
            max *= padding;
        } else {
            max /= padding;
        }
        if min > 0.0 {
            min /= padding;
        } else {
            min *= padding;
        }

        Ok(Self {
            min,
            max,
            avg,
            unique,
        })
    }

    /// Bounds of `field` across `records` (own values only).
    ///
    /// # Errors
    ///
    /// See [`Bounds::from_values`].
    pub fn compute<'r>(
        records: impl IntoIterator<Item = &'r Record>,
        field: Field,
        padding: f64,
    ) -> Result<Self, BoundsError> {
        let values: Vec<f64> = records.into_iter().map(|r| r.value(field)).collect();
        Self::from_values(&values, padding)
    }
}

/// Bounds for every numeric field, keyed by field.
///
/// # Errors
///
/// See [`Bounds::from_values`].
pub fn compute_all(
    records: &[&Record],
    padding: f64,
) -> Result<BTreeMap<Field, Bounds>, BoundsError> {
    Field::NUMERIC
        .into_iter()
        .map(|field| Bounds::compute(records.iter().copied(), field, padding).map(|b| (field, b)))
        .collect()
}

/// Distinct display values of `field`, sorted, for filter option lists.
///
/// Numeric fields sort numerically; missing numbers are skipped.
#[must_use]
pub fn unique_values<'r>(records: impl IntoIterator<Item = &'r Record>, field: Field) -> Vec<String> {
    if field.is_numeric() {
        let mut numbers: Vec<f64> = records.into_iter().filter_map(|r| r.number(field)).collect();
        numbers.sort_by(f64::total_cmp);
        numbers.dedup();
        return numbers.into_iter().map(|v| v.to_string()).collect();
    }
    let mut texts: Vec<String> = records.into_iter().map(|r| r.text(field)).collect();
    texts.sort();
    texts.dedup();
    texts
}

#[allow(clippy::cast_precision_loss)]
const fn count_as_f64(count: usize) -> f64 {
    count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_core::{Status, TicketId};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn record(id: u64, revenue: Option<f64>, assignee: &str) -> Record {
        Record {
            id: TicketId::Num(id),
            summary: String::new(),
            assignee: assignee.into(),
            status: Status::New,
            revenue,
            complexity: Some(3.0),
            dependency: None,
            risk: None,
            depends: Vec::new(),
        }
    }

    #[test]
    fn asymmetric_padding_widens_domain() {
        let b = Bounds::from_values(&[-10.0, 5.0, 100.0], 2.0).unwrap();
        assert!(close(b.max, 200.0));
        assert!(close(b.min, -20.0));
        assert!(close(b.avg, 95.0 / 3.0));
        assert_eq!(b.unique, vec![-10.0, 5.0, 100.0]);
    }

    #[test]
    fn positive_min_and_negative_max_divide() {
        let positive = Bounds::from_values(&[4.0, 8.0], 2.0).unwrap();
        assert!(close(positive.min, 2.0));
        assert!(close(positive.max, 16.0));

        let negative = Bounds::from_values(&[-8.0, -4.0], 2.0).unwrap();
        assert!(close(negative.min, -16.0));
        assert!(close(negative.max, -2.0));
    }

    #[test]
    fn unit_padding_is_raw_range() {
        let b = Bounds::from_values(&[3.0, 1.0, 3.0], 1.0).unwrap();
        assert!(close(b.min, 1.0));
        assert!(close(b.max, 3.0));
        assert_eq!(b.unique, vec![1.0, 3.0]);
    }

    #[test]
    fn empty_set_is_an_error() {
        assert_eq!(Bounds::from_values(&[], 1.0), Err(BoundsError::Empty));
        assert_eq!(
            Bounds::compute(std::iter::empty(), Field::Risk, 1.0),
            Err(BoundsError::Empty)
        );
    }

    #[test]
    fn bad_padding_is_rejected() {
        assert_eq!(Bounds::from_values(&[1.0], 0.0), Err(BoundsError::InvalidPadding(0.0)));
        assert!(Bounds::from_values(&[1.0], f64::NAN).is_err());
    }

    #[test]
    fn missing_values_count_as_zero() {
        let records = [record(1, Some(6.0), "a"), record(2, None, "b")];
        let b = Bounds::compute(&records, Field::Revenue, 1.0).unwrap();
        assert!(close(b.min, 0.0));
        assert!(close(b.avg, 3.0));
    }

    #[test]
    fn compute_all_covers_numeric_fields() {
        let records = [record(1, Some(6.0), "a")];
        let refs: Vec<&Record> = records.iter().collect();
        let all = compute_all(&refs, 1.0).unwrap();
        assert_eq!(all.keys().copied().collect::<Vec<_>>(), Field::NUMERIC.to_vec());
        assert!(close(all[&Field::Complexity].max, 3.0));
    }

    #[test]
    fn unique_values_for_filter_options() {
        let records = [
            record(1, Some(10.0), "carol"),
            record(2, Some(2.0), "alice"),
            record(3, None, "carol"),
            record(4, Some(2.0), "bob"),
        ];
        assert_eq!(unique_values(&records, Field::Revenue), vec!["2", "10"]);
        assert_eq!(unique_values(&records, Field::Assignee), vec!["alice", "bob", "carol"]);
    }
}
