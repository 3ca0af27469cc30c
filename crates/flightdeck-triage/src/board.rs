//! Dashboard assembly: one classification pass over a snapshot.
//!
//! [`Dashboard::build`] is the only entry point the presentation layer
//! needs. It runs every predicate, composes board columns with
//! [`filtered_list`], groups by member and team and computes the count
//! tables. The pass holds no state between calls; building twice from the
//! same snapshot gives equal dashboards.
//!
//! Fixed, testing and grouping columns cover active tickets only (anything
//! not yet `CLOSED`). Totals and count tables cover the whole snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use flightdeck_core::config::ProjectConfig;
use flightdeck_core::{Collection, FlagKind, FlagSign, Snapshot};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::aggregate::stats::{self, Tally};
use crate::aggregate::{MemberGroups, TeamGroup, TeamMembership, group_by_member, group_by_team};
use crate::classify::{Classifier, FixTarget, bugs_with_flag, predicates};
use crate::setops::filtered_list;
use crate::workflow::WorkflowState;

/// Which columns a pass computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMode {
    /// Overview lists only.
    #[default]
    List,
    /// Overview lists plus the kanban columns.
    Board,
}

impl BoardMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Board => "board",
        }
    }
}

impl fmt::Display for BoardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "board" | "kanban" => Ok(Self::Board),
            other => Err(format!("invalid board mode: '{other}'")),
        }
    }
}

/// Caller-supplied context for a pass: identity, clock and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardContext {
    /// Login whose tickets populate `bugsMine`.
    pub login: Option<String>,
    /// "Today" for `bugsChangedToday`.
    pub today: NaiveDate,
    pub mode: BoardMode,
}

/// Kanban columns, present only in [`BoardMode::Board`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumns<'a> {
    /// Open concepts awaiting screen design.
    pub all_screen_wip: Collection<'a>,
    pub all_screen_approved: Collection<'a>,
    /// Unworked stack, minus concepts.
    pub all_bugs_open: Collection<'a>,
    pub all_bugs_testing: Collection<'a>,
    pub open_waiting: Collection<'a>,
    pub bugs_wip: Collection<'a>,
    /// `bugsFixed - allBugsTesting - allScreenApproved`.
    pub bugs_fixed_without_testing: Collection<'a>,
}

/// Every named value the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub bugs_reopened: Collection<'a>,
    pub bugs_testserver: Collection<'a>,
    pub bugs_branch: Collection<'a>,
    pub bugs_trunk: Collection<'a>,
    /// Fixed with an unrecognized or missing target branch.
    pub bugs_fixed: Collection<'a>,
    /// Open and themed.
    pub bugs_open: Collection<'a>,
    pub bugs_unthemed: Collection<'a>,

    /// Kanban columns; `None` in list mode, and then absent from the JSON.
    #[serde(flatten)]
    pub board: Option<BoardColumns<'a>>,

    #[serde(rename = "aMemberBugs")]
    pub member_bugs: MemberGroups<'a>,
    #[serde(rename = "aTeamBugs")]
    pub team_bugs: BTreeMap<String, TeamGroup<'a>>,
    #[serde(rename = "iTotal")]
    pub total: usize,
    /// Tickets per workflow state.
    #[serde(rename = "aStats")]
    pub stats: Tally,
    #[serde(rename = "aStatuses")]
    pub statuses: Tally,
    #[serde(rename = "aPriorities")]
    pub priorities: Tally,
    #[serde(rename = "aSeverities")]
    pub severities: Tally,
    #[serde(rename = "aThemes")]
    pub themes: BTreeMap<String, usize>,

    pub bugs_changed_today: Collection<'a>,
    pub bugs_mine: Collection<'a>,
    pub snapshot_hash: String,
}

impl<'a> Dashboard<'a> {
    #[must_use]
    #[instrument(skip_all, fields(mode = %context.mode, tickets = snapshot.len()))]
    pub fn build(snapshot: &'a Snapshot, context: &BoardContext, config: &ProjectConfig) -> Self {
        let classifier = Classifier::new(&config.board);
        let all = snapshot.all();
        let active = all.filter(|t| !predicates::is_closed(t));

        let bugs_reopened = all.filter(|t| predicates::is_open(t) && predicates::is_reopened(t));
        let bugs_testserver = bugs_with_flag(&active, FlagKind::Testserver, FlagSign::Requested);
        let bugs_branch = classifier.fixed_in(&active, FixTarget::Branch);
        let bugs_trunk = classifier.fixed_in(&active, FixTarget::Trunk);
        let bugs_fixed = classifier.fixed_in(&active, FixTarget::Unknown);
        let bugs_open = all.filter(predicates::is_themed);
        let bugs_unthemed = all.filter(predicates::is_unthemed);

        let board = (context.mode == BoardMode::Board)
            .then(|| board_columns(&classifier, &active, &bugs_fixed));

        let member_bugs = group_by_member(&active);
        let team_bugs = group_by_team(&member_bugs, &TeamMembership::from_teams(&config.teams));
        let bugs_mine = context
            .login
            .as_deref()
            .and_then(|login| member_bugs.get(login.trim()))
            .cloned()
            .unwrap_or_default();

        let bugs_changed_today = all.filter(|t| predicates::is_changed_on(t, context.today));
        let irregular = irregular_histories(&all, &classifier);

        debug!(
            reopened = bugs_reopened.len(),
            fixed = bugs_branch.len() + bugs_trunk.len() + bugs_fixed.len(),
            members = member_bugs.len(),
            changed_today = bugs_changed_today.len(),
            irregular,
            "dashboard pass complete"
        );

        Self {
            bugs_reopened,
            bugs_testserver,
            bugs_branch,
            bugs_trunk,
            bugs_fixed,
            bugs_open,
            bugs_unthemed,
            board,
            member_bugs,
            team_bugs,
            total: all.len(),
            stats: stats::by_workflow(&all, &classifier),
            statuses: stats::by_status(&all),
            priorities: stats::by_priority(&all),
            severities: stats::by_severity(&all),
            themes: stats::by_theme(&all),
            bugs_changed_today,
            bugs_mine,
            snapshot_hash: snapshot.content_hash(),
        }
    }

    /// Every named ticket list with its wire name, in rendering order.
    #[must_use]
    pub fn named_collections(&self) -> Vec<(&'static str, &Collection<'a>)> {
        let mut named = vec![
            ("bugsReopened", &self.bugs_reopened),
            ("bugsTestserver", &self.bugs_testserver),
            ("bugsBranch", &self.bugs_branch),
            ("bugsTrunk", &self.bugs_trunk),
            ("bugsFixed", &self.bugs_fixed),
            ("bugsOpen", &self.bugs_open),
            ("bugsUnthemed", &self.bugs_unthemed),
        ];
        if let Some(board) = &self.board {
            named.extend([
                ("allScreenWip", &board.all_screen_wip),
                ("allScreenApproved", &board.all_screen_approved),
                ("allBugsOpen", &board.all_bugs_open),
                ("allBugsTesting", &board.all_bugs_testing),
                ("openWaiting", &board.open_waiting),
                ("bugsWip", &board.bugs_wip),
                ("bugsFixedWithoutTesting", &board.bugs_fixed_without_testing),
            ]);
        }
        named.push(("bugsChangedToday", &self.bugs_changed_today));
        named.push(("bugsMine", &self.bugs_mine));
        named
    }
}

fn board_columns<'a>(
    classifier: &Classifier,
    active: &Collection<'a>,
    bugs_fixed: &Collection<'a>,
) -> BoardColumns<'a> {
    let all_screen_wip = active.filter(|t| classifier.is_open_concept(t));
    let all_screen_approved = bugs_with_flag(active, FlagKind::Screen, FlagSign::Granted);
    let unworked = active.filter(predicates::is_unworked);
    let all_bugs_open = filtered_list(&unworked, &[&all_screen_wip]);
    let all_bugs_testing = bugs_with_flag(active, FlagKind::Testing, FlagSign::Requested);
    let open_waiting = active.filter(predicates::is_waiting);
    let bugs_wip = classifier.in_progress(active);
    let bugs_fixed_without_testing =
        filtered_list(bugs_fixed, &[&all_bugs_testing, &all_screen_approved]);

    BoardColumns {
        all_screen_wip,
        all_screen_approved,
        all_bugs_open,
        all_bugs_testing,
        open_waiting,
        bugs_wip,
        bugs_fixed_without_testing,
    }
}

/// Warn about logged moves the workflow does not allow; returns how many
/// tickets have at least one.
fn irregular_histories(all: &Collection<'_>, classifier: &Classifier) -> usize {
    all.iter()
        .filter(|ticket| {
            let violations = WorkflowState::history_violations(ticket, classifier);
            for err in &violations {
                warn!(ticket = %ticket.id, %err, "transition log breaks workflow rules");
            }
            !violations.is_empty()
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_core::{Change, Status, Ticket, Transition};

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Board".parse::<BoardMode>().unwrap(), BoardMode::Board);
        assert_eq!("list".parse::<BoardMode>().unwrap(), BoardMode::List);
        assert!("grid".parse::<BoardMode>().is_err());
    }

    #[test]
    fn irregular_histories_counts_tickets_not_edges() {
        let status_change = |from, to| Transition {
            at: chrono::DateTime::<chrono::Utc>::default(),
            who: String::new(),
            change: Change::Status { from, to },
        };
        let mut skipped = Ticket::new(1, Status::Closed, "alice");
        skipped.history = vec![
            status_change(Status::Assigned, Status::Closed),
            status_change(Status::Closed, Status::Assigned),
            status_change(Status::Assigned, Status::Closed),
        ];
        let mut regular = Ticket::new(2, Status::Resolved, "bob");
        regular.history = vec![status_change(Status::Assigned, Status::Resolved)];
        let quiet = Ticket::new(3, Status::New, "carol");

        let all: Collection<'_> = [&skipped, &regular, &quiet].into_iter().collect();
        assert_eq!(irregular_histories(&all, &Classifier::default()), 1);
    }
}
