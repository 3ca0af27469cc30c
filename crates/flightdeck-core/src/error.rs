use std::fmt;

use crate::model::ticket::TicketId;

/// Machine-readable error codes for scripted consumers of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SnapshotNotFound,
    SnapshotParseError,
    ConfigParseError,
    DuplicateTicket,
    InvalidStateTransition,
    EmptyBoundsSet,
    UnknownField,
    InvalidFilter,
    InvalidPadding,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SnapshotNotFound => "E1001",
            Self::SnapshotParseError => "E1002",
            Self::ConfigParseError => "E1003",
            Self::DuplicateTicket => "E2001",
            Self::InvalidStateTransition => "E2003",
            Self::EmptyBoundsSet => "E3001",
            Self::UnknownField => "E3002",
            Self::InvalidFilter => "E3003",
            Self::InvalidPadding => "E3004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SnapshotNotFound => "Ticket snapshot not found",
            Self::SnapshotParseError => "Ticket snapshot parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::DuplicateTicket => "Duplicate ticket id in snapshot",
            Self::InvalidStateTransition => "Invalid workflow transition",
            Self::EmptyBoundsSet => "Cannot compute bounds of empty set",
            Self::UnknownField => "Unknown analytics field",
            Self::InvalidFilter => "Malformed analytics filter",
            Self::InvalidPadding => "Invalid bounds padding factor",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::SnapshotNotFound => Some("Pass an existing export with `--snapshot <file>`."),
            Self::SnapshotParseError => {
                Some("Export must be a JSON array of tickets or an object with a `tickets` array.")
            }
            Self::ConfigParseError => Some("Fix syntax in .flightdeck/config.toml and retry."),
            Self::DuplicateTicket => Some("Re-export the snapshot; each ticket id must appear once."),
            Self::InvalidStateTransition => Some(
                "Follow the workflow: new -> assigned -> resolved -> testing -> closed.",
            ),
            Self::EmptyBoundsSet => Some("Relax the active filters so at least one ticket remains."),
            Self::UnknownField => Some(
                "Use one of: revenue, complexity, dependency, risk, summary, assignee, status.",
            ),
            Self::InvalidFilter => Some("Write filters as FIELD=VALUE, FIELD>=VALUE or FIELD<=VALUE."),
            Self::InvalidPadding => Some("Use a positive padding factor such as 1.0 or 1.1."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while ingesting a ticket snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The snapshot was not valid JSON or did not match the ticket schema.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The snapshot could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two records in one snapshot share an id.
    #[error("duplicate ticket id {0} in snapshot")]
    DuplicateTicket(TicketId),
}

impl ModelError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Parse(_) => ErrorCode::SnapshotParseError,
            Self::Io(_) => ErrorCode::SnapshotNotFound,
            Self::DuplicateTicket(_) => ErrorCode::DuplicateTicket,
        }
    }

    /// Remediation suggestion, falling back to the generic code message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
