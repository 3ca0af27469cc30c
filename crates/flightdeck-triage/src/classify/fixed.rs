use serde::Serialize;
use std::fmt;

/// Where a resolved ticket's fix landed.
///
/// Every ticket at `RESOLVED` or later maps to exactly one target;
/// [`FixTarget::Unknown`] absorbs missing and unrecognized branch values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixTarget {
    Trunk,
    Branch,
    Unknown,
}

impl FixTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trunk => "trunk",
            Self::Branch => "branch",
            Self::Unknown => "unknown",
        }
    }

    /// Match a raw target-branch value against already-normalized trunk names
    /// and branch prefixes. Trunk wins when both match.
    #[must_use]
    pub fn from_branch(branch: Option<&str>, trunk_names: &[String], prefixes: &[String]) -> Self {
        let Some(branch) = branch
            .map(|b| b.trim().to_ascii_lowercase())
            .filter(|b| !b.is_empty())
        else {
            return Self::Unknown;
        };

        if trunk_names.iter().any(|name| *name == branch) {
            Self::Trunk
        } else if prefixes.iter().any(|prefix| branch.starts_with(prefix.as_str())) {
            Self::Branch
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for FixTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
