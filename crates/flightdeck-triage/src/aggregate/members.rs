use std::collections::BTreeMap;

use flightdeck_core::Collection;
use serde::Serialize;
use tracing::warn;

/// Team name used for members that appear in no configured team.
pub const UNASSIGNED_TEAM: &str = "unassigned";

/// Tickets per assignee, keyed by trimmed login in sorted order.
pub type MemberGroups<'a> = BTreeMap<String, Collection<'a>>;

/// Partition a collection by assignee.
///
/// Every ticket lands in exactly one group; assignees without tickets do
/// not appear.
#[must_use]
pub fn group_by_member<'a>(tickets: &Collection<'a>) -> MemberGroups<'a> {
    let mut groups = MemberGroups::new();
    for ticket in tickets {
        groups
            .entry(ticket.assignee.trim().to_string())
            .or_default()
            .insert(ticket);
    }
    groups
}

/// Member → team lookup.
#[derive(Debug, Clone, Default)]
pub struct TeamMembership {
    team_of: BTreeMap<String, String>,
}

impl TeamMembership {
    /// Invert a team → members table.
    ///
    /// A login listed under several teams stays with the first team in
    /// name order. [`UNASSIGNED_TEAM`] is reserved: a configured team of
    /// that name (in any case) is skipped, and its members count as unlisted.
    #[must_use]
    pub fn from_teams(teams: &BTreeMap<String, Vec<String>>) -> Self {
        let mut team_of = BTreeMap::new();
        for (team, members) in teams {
            if team.trim().eq_ignore_ascii_case(UNASSIGNED_TEAM) {
                warn!(team = %team, members = members.len(), "team name is reserved, ignoring it");
                continue;
            }
            for member in members {
                let member = member.trim();
                if let Some(existing) = team_of.get(member) {
                    warn!(member, kept = %existing, ignored = %team, "member listed in several teams");
                    continue;
                }
                team_of.insert(member.to_string(), team.clone());
            }
        }
        Self { team_of }
    }

    #[must_use]
    pub fn team_of(&self, member: &str) -> Option<&str> {
        self.team_of.get(member.trim()).map(String::as_str)
    }
}

/// One team's per-member workload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamGroup<'a> {
    pub members: MemberGroups<'a>,
}

impl TeamGroup<'_> {
    /// Tickets across all members of the team.
    #[must_use]
    pub fn total(&self) -> usize {
        self.members.values().map(Collection::len).sum()
    }
}

/// Roll member groups up into teams.
///
/// Members missing from `membership` go to [`UNASSIGNED_TEAM`] instead of
/// being dropped.
#[must_use]
pub fn group_by_team<'a>(
    member_groups: &MemberGroups<'a>,
    membership: &TeamMembership,
) -> BTreeMap<String, TeamGroup<'a>> {
    let mut teams: BTreeMap<String, TeamGroup<'a>> = BTreeMap::new();
    for (member, tickets) in member_groups {
        let team = membership.team_of(member).unwrap_or(UNASSIGNED_TEAM);
        teams
            .entry(team.to_string())
            .or_default()
            .members
            .insert(member.clone(), tickets.clone());
    }
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_core::{Status, Ticket};

    fn roster() -> Vec<Ticket> {
        vec![
            Ticket::new(1, Status::New, "alice"),
            Ticket::new(2, Status::Assigned, "bob"),
            Ticket::new(3, Status::Resolved, "alice"),
            Ticket::new(4, Status::Assigned, " alice "),
            Ticket::new(5, Status::New, "bob"),
        ]
    }

    #[test]
    fn members_partition_without_loss() {
        let tickets = roster();
        let all: Collection<'_> = tickets.iter().collect();
        let groups = group_by_member(&all);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["alice"].len(), 3);
        assert_eq!(groups["bob"].len(), 2);
        assert_eq!(groups.values().map(Collection::len).sum::<usize>(), all.len());
    }

    #[test]
    fn teams_roll_up_members_and_keep_strangers() {
        let tickets = roster();
        let all: Collection<'_> = tickets.iter().collect();
        let groups = group_by_member(&all);

        let mut table = BTreeMap::new();
        table.insert("checkout".to_string(), vec!["alice".to_string()]);
        let teams = group_by_team(&groups, &TeamMembership::from_teams(&table));

        assert_eq!(teams["checkout"].total(), 3);
        assert_eq!(teams[UNASSIGNED_TEAM].members.keys().collect::<Vec<_>>(), vec!["bob"]);
    }

    #[test]
    fn first_team_wins_for_duplicate_members() {
        let mut table = BTreeMap::new();
        table.insert("b-team".to_string(), vec!["carol".to_string()]);
        table.insert("a-team".to_string(), vec!["carol".to_string()]);
        let membership = TeamMembership::from_teams(&table);
        assert_eq!(membership.team_of("carol"), Some("a-team"));
        assert_eq!(membership.team_of("dave"), None);
    }

    #[test]
    fn configured_unassigned_team_is_ignored() {
        let mut table = BTreeMap::new();
        table.insert(" Unassigned".to_string(), vec!["erin".to_string()]);
        table.insert("unassigned".to_string(), vec!["frank".to_string()]);
        table.insert("zeta".to_string(), vec!["frank".to_string()]);
        let membership = TeamMembership::from_teams(&table);
        assert_eq!(membership.team_of("erin"), None);
        assert_eq!(membership.team_of("frank"), Some("zeta"));

        let tickets = vec![
            Ticket::new(1, Status::New, "erin"),
            Ticket::new(2, Status::New, "frank"),
        ];
        let all: Collection<'_> = tickets.iter().collect();
        let teams = group_by_team(&group_by_member(&all), &membership);
        assert_eq!(teams.keys().collect::<Vec<_>>(), vec![UNASSIGNED_TEAM, "zeta"]);
    }
}
