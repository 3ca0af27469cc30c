use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// Plottable and filterable ticket fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Revenue,
    Complexity,
    Dependency,
    Risk,
    Summary,
    Assignee,
    Status,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::Revenue,
        Self::Complexity,
        Self::Dependency,
        Self::Risk,
        Self::Summary,
        Self::Assignee,
        Self::Status,
    ];

    pub const NUMERIC: [Self; 4] = [Self::Revenue, Self::Complexity, Self::Dependency, Self::Risk];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Complexity => "complexity",
            Self::Dependency => "dependency",
            Self::Risk => "risk",
            Self::Summary => "summary",
            Self::Assignee => "assignee",
            Self::Status => "status",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Revenue | Self::Complexity | Self::Dependency | Self::Risk
        )
    }

    /// Comparator a bare `field=value` filter uses.
    ///
    /// Revenue filters keep tickets worth at least the reference; rating
    /// filters keep tickets rated at most the reference.
    #[must_use]
    pub const fn default_comparator(self) -> Comparator {
        match self {
            Self::Summary | Self::Assignee | Self::Status => Comparator::Equals,
            Self::Revenue => Comparator::AtLeast,
            Self::Complexity | Self::Dependency | Self::Risk => Comparator::AtMost,
        }
    }

    /// Like [`FromStr`], but rejects categorical fields.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Unknown`] or [`FieldError::NotNumeric`].
    pub fn parse_numeric(raw: &str) -> Result<Self, FieldError> {
        let field: Self = raw.parse()?;
        if field.is_numeric() {
            Ok(field)
        } else {
            Err(FieldError::NotNumeric(field))
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::Unknown(s.to_string()))
    }
}

/// How a filter compares a ticket's field to the reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Loose equality: numeric when both sides parse, text otherwise.
    Equals,
    AtLeast,
    AtMost,
}

impl Comparator {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Revenue".parse::<Field>().unwrap(), Field::Revenue);
        assert_eq!(" risk ".parse::<Field>().unwrap(), Field::Risk);
        assert_eq!(
            "velocity".parse::<Field>().unwrap_err(),
            FieldError::Unknown("velocity".into())
        );
    }

    #[test]
    fn numeric_parse_rejects_categories() {
        assert_eq!(Field::parse_numeric("complexity").unwrap(), Field::Complexity);
        assert_eq!(
            Field::parse_numeric("assignee").unwrap_err(),
            FieldError::NotNumeric(Field::Assignee)
        );
    }

    #[test]
    fn default_comparators() {
        assert_eq!(Field::Summary.default_comparator(), Comparator::Equals);
        assert_eq!(Field::Status.default_comparator(), Comparator::Equals);
        assert_eq!(Field::Revenue.default_comparator(), Comparator::AtLeast);
        assert_eq!(Field::Risk.default_comparator(), Comparator::AtMost);
        assert!(Field::NUMERIC.iter().all(|f| f.is_numeric()));
    }
}
