//! Sign-off flags carried by a ticket.
//!
//! Every ticket has exactly one [`FlagState`] per [`FlagKind`], stored in a
//! fixed-size array. A kind the tracker did not export is [`FlagState::Unset`];
//! looking up a flag never fails.
//!
//! On the wire flags are the tracker's record list:
//!
//! ```json
//! [{ "name": "testing", "status": "?", "requester": "bob" },
//!  { "name": "screen",  "status": "+" }]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalize;
use super::ticket::ParseEnumError;

/// Known flag kinds.
///
/// Deserializes through [`FromStr`], so tracker spellings such as `DB-Change`
/// are accepted; serializes as [`FlagKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FlagKind {
    Testing,
    Screen,
    DbChange,
    DbChangeTest,
    Merge,
    Translation,
    Comment,
    Testserver,
}

impl FlagKind {
    pub const COUNT: usize = 8;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Testing,
        Self::Screen,
        Self::DbChange,
        Self::DbChangeTest,
        Self::Merge,
        Self::Translation,
        Self::Comment,
        Self::Testserver,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Testing => "testing",
            Self::Screen => "screen",
            Self::DbChange => "dbchange",
            Self::DbChangeTest => "dbchange_test",
            Self::Merge => "merge",
            Self::Translation => "translation",
            Self::Comment => "comment",
            Self::Testserver => "testserver",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FlagKind {
    type Error = ParseEnumError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<FlagKind> for &'static str {
    fn from(kind: FlagKind) -> Self {
        kind.as_str()
    }
}

impl FromStr for FlagKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).replace(['-', ' '], "_").as_str() {
            "testing" => Ok(Self::Testing),
            "screen" => Ok(Self::Screen),
            "dbchange" | "db_change" => Ok(Self::DbChange),
            "dbchange_test" | "db_change_test" => Ok(Self::DbChangeTest),
            "merge" => Ok(Self::Merge),
            "translation" => Ok(Self::Translation),
            "comment" => Ok(Self::Comment),
            "testserver" | "test_server" => Ok(Self::Testserver),
            _ => Err(ParseEnumError {
                expected: "flag",
                got: s.to_string(),
            }),
        }
    }
}

/// Requester-less projection of a [`FlagState`], used for exact matching.
///
/// Reads tracker symbols (`?`, `+`, `-`) as well as words; writes words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FlagSign {
    Unset,
    Requested,
    Granted,
    Denied,
}

impl FlagSign {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Requested => "requested",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    /// Tracker notation: `""`, `"?"`, `"+"`, `"-"`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Requested => "?",
            Self::Granted => "+",
            Self::Denied => "-",
        }
    }

    /// Parse tracker notation; anything unrecognized is `Unset`.
    #[must_use]
    pub fn from_symbol(raw: &str) -> Self {
        match raw.trim() {
            "?" => Self::Requested,
            "+" => Self::Granted,
            "-" => Self::Denied,
            _ => Self::Unset,
        }
    }
}

impl TryFrom<String> for FlagSign {
    type Error = ParseEnumError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<FlagSign> for &'static str {
    fn from(sign: FlagSign) -> Self {
        sign.as_str()
    }
}

impl FromStr for FlagSign {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "?" | "requested" | "request" => Ok(Self::Requested),
            "+" | "granted" | "grant" => Ok(Self::Granted),
            "-" | "denied" | "deny" => Ok(Self::Denied),
            "" | "unset" | "none" => Ok(Self::Unset),
            _ => Err(ParseEnumError {
                expected: "flag state",
                got: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FlagSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Current state of one flag kind on one ticket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagState {
    #[default]
    Unset,
    Requested { by: Option<String> },
    Granted,
    Denied,
}

impl FlagState {
    #[must_use]
    pub const fn sign(&self) -> FlagSign {
        match self {
            Self::Unset => FlagSign::Unset,
            Self::Requested { .. } => FlagSign::Requested,
            Self::Granted => FlagSign::Granted,
            Self::Denied => FlagSign::Denied,
        }
    }

    /// Identity that asked for the sign-off, when requested.
    #[must_use]
    pub fn requester(&self) -> Option<&str> {
        match self {
            Self::Requested { by } => by.as_deref(),
            _ => None,
        }
    }
}

/// One flag record as exported by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRecord {
    pub name: String,
    pub status: String,
    #[serde(default, alias = "setter", skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
}

/// Fixed-size flag table, one state per [`FlagKind`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FlagRecord>", into = "Vec<FlagRecord>")]
pub struct Flags {
    states: [FlagState; FlagKind::COUNT],
}

impl Flags {
    #[must_use]
    pub fn get(&self, kind: FlagKind) -> &FlagState {
        &self.states[kind.index()]
    }

    pub fn set(&mut self, kind: FlagKind, state: FlagState) {
        self.states[kind.index()] = state;
    }

    /// Builder-style [`Flags::set`].
    #[must_use]
    pub fn with(mut self, kind: FlagKind, state: FlagState) -> Self {
        self.set(kind, state);
        self
    }

    /// Iterate over kinds that are not `Unset`.
    pub fn iter_set(&self) -> impl Iterator<Item = (FlagKind, &FlagState)> {
        FlagKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, state)| **state != FlagState::Unset)
    }
}

impl From<Vec<FlagRecord>> for Flags {
    fn from(records: Vec<FlagRecord>) -> Self {
        let mut flags = Self::default();
        for record in records {
            let Ok(kind) = record.name.parse::<FlagKind>() else {
                tracing::debug!(flag = %record.name, "ignoring unknown flag kind");
                continue;
            };
            let state = match FlagSign::from_symbol(&record.status) {
                FlagSign::Unset => FlagState::Unset,
                FlagSign::Requested => FlagState::Requested {
                    by: record.requester.filter(|r| !r.trim().is_empty()),
                },
                FlagSign::Granted => FlagState::Granted,
                FlagSign::Denied => FlagState::Denied,
            };
            flags.set(kind, state);
        }
        flags
    }
}

impl From<Flags> for Vec<FlagRecord> {
    fn from(flags: Flags) -> Self {
        flags
            .iter_set()
            .map(|(kind, state)| FlagRecord {
                name: kind.as_str().to_string(),
                status: state.sign().symbol().to_string(),
                requester: state.requester().map(ToString::to_string),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flag_is_unset() {
        let flags = Flags::default();
        for kind in FlagKind::ALL {
            assert_eq!(flags.get(kind), &FlagState::Unset);
        }
    }

    #[test]
    fn records_map_to_states() {
        let flags = Flags::from(vec![
            FlagRecord {
                name: "testing".into(),
                status: "?".into(),
                requester: Some("bob".into()),
            },
            FlagRecord {
                name: "DB-Change".into(),
                status: "+".into(),
                requester: None,
            },
            FlagRecord {
                name: "merge".into(),
                status: "-".into(),
                requester: None,
            },
        ]);

        assert_eq!(flags.get(FlagKind::Testing).requester(), Some("bob"));
        assert_eq!(flags.get(FlagKind::DbChange).sign(), FlagSign::Granted);
        assert_eq!(flags.get(FlagKind::Merge).sign(), FlagSign::Denied);
        assert_eq!(flags.get(FlagKind::Screen).sign(), FlagSign::Unset);
    }

    #[test]
    fn unknown_kinds_and_states_are_tolerated() {
        let flags = Flags::from(vec![
            FlagRecord {
                name: "blessing".into(),
                status: "+".into(),
                requester: None,
            },
            FlagRecord {
                name: "screen".into(),
                status: "~".into(),
                requester: None,
            },
        ]);
        assert_eq!(flags.iter_set().count(), 0);
    }

    #[test]
    fn later_record_of_same_kind_wins() {
        let flags = Flags::from(vec![
            FlagRecord {
                name: "testing".into(),
                status: "?".into(),
                requester: None,
            },
            FlagRecord {
                name: "testing".into(),
                status: "+".into(),
                requester: None,
            },
        ]);
        assert_eq!(flags.get(FlagKind::Testing), &FlagState::Granted);
    }

    #[test]
    fn json_shape_roundtrips() {
        let flags = Flags::default()
            .with(FlagKind::Screen, FlagState::Granted)
            .with(
                FlagKind::Comment,
                FlagState::Requested {
                    by: Some("carol".into()),
                },
            );
        let json = serde_json::to_value(&flags).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "screen", "status": "+"},
                {"name": "comment", "status": "?", "requester": "carol"}
            ])
        );
        let back: Flags = serde_json::from_value(json).unwrap();
        assert_eq!(back, flags);
    }

    #[test]
    fn sign_parsing_accepts_words_and_symbols() {
        assert_eq!("granted".parse::<FlagSign>().unwrap(), FlagSign::Granted);
        assert_eq!("?".parse::<FlagSign>().unwrap(), FlagSign::Requested);
        assert!("maybe".parse::<FlagSign>().is_err());
    }

    #[test]
    fn kind_and_sign_read_tracker_spellings() {
        let kind: FlagKind = serde_json::from_str("\"DB-Change\"").unwrap();
        assert_eq!(kind, FlagKind::DbChange);
        assert_eq!(serde_json::to_string(&FlagKind::DbChangeTest).unwrap(), "\"dbchange_test\"");

        let sign: FlagSign = serde_json::from_str("\"+\"").unwrap();
        assert_eq!(sign, FlagSign::Granted);
        assert_eq!(serde_json::to_string(&FlagSign::Requested).unwrap(), "\"requested\"");
        assert!(serde_json::from_str::<FlagSign>("\"~\"").is_err());
    }
}
