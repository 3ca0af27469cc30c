use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::flag::{FlagKind, FlagSign, FlagState, Flags};
use super::history::Transition;
use super::normalize;

/// Stable tracker identifier of a ticket.
///
/// Trackers hand out either numbers (`123`) or keys (`"PROJ-7"`). A string
/// that parses as a number is the same id as that number, so `123` and
/// `"123"` compare equal. Numbers serialize as JSON numbers, keys as strings.
///
/// Numeric ids order before keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "RawTicketId")]
pub enum TicketId {
    Num(u64),
    Key(String),
}

impl TicketId {
    #[must_use]
    pub const fn as_number(&self) -> Option<u64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Key(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTicketId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawTicketId> for TicketId {
    type Error = String;

    fn try_from(raw: RawTicketId) -> Result<Self, Self::Error> {
        match raw {
            RawTicketId::Number(n) => Ok(Self::Num(n)),
            RawTicketId::Text(s) => s.parse(),
        }
    }
}

impl FromStr for TicketId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("invalid ticket id: empty".to_string());
        }
        Ok(trimmed
            .parse()
            .map_or_else(|_| Self::Key(trimmed.to_string()), Self::Num))
    }
}

impl From<u64> for TicketId {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

impl Serialize for TicketId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Num(n) => serializer.serialize_u64(*n),
            Self::Key(key) => serializer.serialize_str(key),
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => fmt::Display::fmt(n, f),
            Self::Key(key) => f.pad(key),
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// Tracker workflow status, ordered from intake to terminal.
///
/// `Unknown` is outside the ordering: it is never "at least" any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Status {
    Unconfirmed,
    New,
    Assigned,
    Reopened,
    Clarification,
    Resolved,
    Verified,
    Closed,
    Unknown,
}

impl Status {
    /// Every ordered status, lowest first.
    pub const ORDERED: [Self; 8] = [
        Self::Unconfirmed,
        Self::New,
        Self::Assigned,
        Self::Reopened,
        Self::Clarification,
        Self::Resolved,
        Self::Verified,
        Self::Closed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfirmed => "UNCONFIRMED",
            Self::New => "NEW",
            Self::Assigned => "ASSIGNED",
            Self::Reopened => "REOPENED",
            Self::Clarification => "CLARIFICATION",
            Self::Resolved => "RESOLVED",
            Self::Verified => "VERIFIED",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Position in the workflow ordering, `None` for [`Status::Unknown`].
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Unconfirmed => Some(0),
            Self::New => Some(1),
            Self::Assigned => Some(2),
            Self::Reopened => Some(3),
            Self::Clarification => Some(4),
            Self::Resolved => Some(5),
            Self::Verified => Some(6),
            Self::Closed => Some(7),
            Self::Unknown => None,
        }
    }

    /// `true` when both statuses are known and `self` is not below `floor`.
    #[must_use]
    pub fn is_at_least(self, floor: Self) -> bool {
        matches!((self.rank(), floor.rank()), (Some(a), Some(b)) if a >= b)
    }

    /// `true` when both statuses are known and `self` is strictly below `ceiling`.
    #[must_use]
    pub fn is_below(self, ceiling: Self) -> bool {
        matches!((self.rank(), ceiling.rank()), (Some(a), Some(b)) if a < b)
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "unconfirmed" => Ok(Self::Unconfirmed),
            "new" => Ok(Self::New),
            "assigned" => Ok(Self::Assigned),
            "reopened" => Ok(Self::Reopened),
            "clarification" => Ok(Self::Clarification),
            "resolved" => Ok(Self::Resolved),
            "verified" => Ok(Self::Verified),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(status = %raw, "unrecognized ticket status");
            Self::Unknown
        })
    }
}

impl From<Status> for &'static str {
    fn from(status: Status) -> Self {
        status.as_str()
    }
}

/// Tracker priority (`P1` highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
    P5,
    #[default]
    Unknown,
}

impl Priority {
    pub const KNOWN: [Self; 5] = [Self::P1, Self::P2, Self::P3, Self::P4, Self::P5];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
            Self::P4 => "P4",
            Self::P5 => "P5",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "p1" | "highest" => Ok(Self::P1),
            "p2" | "high" => Ok(Self::P2),
            "p3" | "normal" => Ok(Self::P3),
            "p4" | "low" => Ok(Self::P4),
            "p5" | "lowest" => Ok(Self::P5),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(priority = %raw, "unrecognized ticket priority");
            Self::Unknown
        })
    }
}

impl From<Priority> for &'static str {
    fn from(priority: Priority) -> Self {
        priority.as_str()
    }
}

/// Tracker severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Severity {
    Blocker,
    Critical,
    Major,
    Normal,
    Minor,
    Trivial,
    Enhancement,
    #[default]
    Unknown,
}

impl Severity {
    pub const KNOWN: [Self; 7] = [
        Self::Blocker,
        Self::Critical,
        Self::Major,
        Self::Normal,
        Self::Minor,
        Self::Trivial,
        Self::Enhancement,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocker => "blocker",
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Normal => "normal",
            Self::Minor => "minor",
            Self::Trivial => "trivial",
            Self::Enhancement => "enhancement",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "blocker" => Ok(Self::Blocker),
            "critical" => Ok(Self::Critical),
            "major" => Ok(Self::Major),
            "normal" => Ok(Self::Normal),
            "minor" => Ok(Self::Minor),
            "trivial" => Ok(Self::Trivial),
            "enhancement" => Ok(Self::Enhancement),
            _ => Err(ParseEnumError {
                expected: "severity",
                got: s.to_string(),
            }),
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(severity = %raw, "unrecognized ticket severity");
            Self::Unknown
        })
    }
}

impl From<Severity> for &'static str {
    fn from(severity: Severity) -> Self {
        severity.as_str()
    }
}

/// Structural ticket type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Kind {
    Bug,
    #[default]
    Feature,
    /// Organisational item (meetings, reviews, housekeeping).
    Administrative,
    /// Umbrella ticket grouping other tickets; not itself actionable work.
    Container,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::Feature => "feature",
            Self::Administrative => "administrative",
            Self::Container => "container",
        }
    }
}

impl FromStr for Kind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bug" | "defect" => Ok(Self::Bug),
            "feature" | "enhancement" | "task" => Ok(Self::Feature),
            "administrative" | "organization" | "organisation" => Ok(Self::Administrative),
            "container" | "project" | "theme" => Ok(Self::Container),
            _ => Err(ParseEnumError {
                expected: "kind",
                got: s.to_string(),
            }),
        }
    }
}

impl From<String> for Kind {
    fn from(raw: String) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(kind = %raw, "unrecognized ticket type, treating as feature");
            Self::Feature
        })
    }
}

impl From<Kind> for &'static str {
    fn from(kind: Kind) -> Self {
        kind.as_str()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse 1–6 planning ratings used by the analytics plot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ratings {
    pub complexity: Option<f64>,
    pub risk: Option<f64>,
    pub dependency: Option<f64>,
}

/// One tracker record, read-only for the duration of a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default)]
    pub summary: String,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, rename = "type")]
    pub kind: Kind,
    #[serde(default)]
    pub flags: Flags,
    pub assignee: String,
    #[serde(default, alias = "depends_on")]
    pub dependencies: Vec<TicketId>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Umbrella ticket this one belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<TicketId>,
    /// Estimated effort in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub watched: bool,
    #[serde(default)]
    pub ratings: Ratings,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Transition>,
}

impl Ticket {
    /// Minimal ticket with every optional field empty.
    #[must_use]
    pub fn new(id: u64, status: Status, assignee: impl Into<String>) -> Self {
        let epoch = DateTime::<Utc>::default();
        Self {
            id: TicketId::Num(id),
            summary: String::new(),
            status,
            priority: Priority::Unknown,
            severity: Severity::Unknown,
            kind: Kind::Feature,
            flags: Flags::default(),
            assignee: assignee.into(),
            dependencies: Vec::new(),
            revenue: None,
            theme: None,
            target_branch: None,
            container: None,
            estimate: None,
            watched: false,
            ratings: Ratings::default(),
            created_at: epoch,
            changed_at: epoch,
            history: Vec::new(),
        }
    }

    /// State of one flag kind; absent flags are [`FlagState::Unset`].
    #[must_use]
    pub fn flag(&self, kind: FlagKind) -> &FlagState {
        self.flags.get(kind)
    }

    /// `true` when the flag of `kind` currently carries `sign`.
    #[must_use]
    pub fn has_flag(&self, kind: FlagKind, sign: FlagSign) -> bool {
        self.flags.get(kind).sign() == sign
    }

    #[must_use]
    pub fn is_status_at_least(&self, floor: Status) -> bool {
        self.status.is_at_least(floor)
    }

    #[must_use]
    pub fn is_type(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    /// Non-empty theme tag, if any.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Non-empty revenue tag, if any.
    #[must_use]
    pub fn revenue(&self) -> Option<&str> {
        self.revenue.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
