//! `flightdeck members`: active workload per member, optionally per team.

use std::io::{self, Write};

use clap::Args;
use flightdeck_core::{Collection, TicketId};
use flightdeck_triage::aggregate::{TeamMembership, group_by_member, group_by_team};
use flightdeck_triage::classify::predicates;
use serde::Serialize;

use super::{Context, SnapshotArgs, load_snapshot};
use crate::output::{pretty_section, render_mode};

/// Arguments for `flightdeck members`.
#[derive(Args, Debug)]
pub struct MembersArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,

    /// Roll members up into the teams configured in `[teams]`.
    #[arg(long)]
    pub teams: bool,
}

#[derive(Debug, Serialize)]
struct MemberRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    team: Option<String>,
    member: String,
    count: usize,
    tickets: Vec<TicketId>,
}

impl MemberRow {
    fn new(team: Option<&str>, member: &str, tickets: &Collection<'_>) -> Self {
        Self {
            team: team.map(ToString::to_string),
            member: member.to_string(),
            count: tickets.len(),
            tickets: tickets.ids().cloned().collect(),
        }
    }
}

/// Report payload for `flightdeck members`.
#[derive(Debug, Serialize)]
struct MembersReport {
    by_team: bool,
    rows: Vec<MemberRow>,
}

/// Execute `flightdeck members`.
pub fn run_members(args: &MembersArgs, ctx: &Context) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.source.snapshot, ctx.output)?;
    let report = build_report(&snapshot.all(), ctx, args.teams);
    render_mode(ctx.output, &report, render_members_text, render_members_pretty)
}

fn build_report(all: &Collection<'_>, ctx: &Context, by_team: bool) -> MembersReport {
    let active = all.filter(|t| !predicates::is_closed(t));
    let members = group_by_member(&active);

    let rows = if by_team {
        let membership = TeamMembership::from_teams(&ctx.project.teams);
        let teams = group_by_team(&members, &membership);
        teams
            .iter()
            .flat_map(|(team, group)| {
                group.members.iter().map(move |(member, tickets)| {
                    MemberRow::new(Some(team.as_str()), member, tickets)
                })
            })
            .collect()
    } else {
        members
            .iter()
            .map(|(member, tickets)| MemberRow::new(None, member, tickets))
            .collect()
    };

    MembersReport { by_team, rows }
}

fn display_member(member: &str) -> &str {
    if member.is_empty() { "(nobody)" } else { member }
}

fn render_members_text(report: &MembersReport, w: &mut dyn Write) -> io::Result<()> {
    for row in &report.rows {
        let ids = row
            .tickets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        match &row.team {
            Some(team) => writeln!(w, "{team}\t{}\t{}\t{ids}", row.member, row.count)?,
            None => writeln!(w, "{}\t{}\t{ids}", row.member, row.count)?,
        }
    }
    Ok(())
}

fn render_members_pretty(report: &MembersReport, w: &mut dyn Write) -> io::Result<()> {
    let heading = if report.by_team {
        "Workload by team"
    } else {
        "Workload by member"
    };
    pretty_section(w, heading)?;
    if report.rows.is_empty() {
        return writeln!(w, "(no active tickets)");
    }

    let mut current_team: Option<&str> = None;
    for row in &report.rows {
        let team = row.team.as_deref();
        if team.is_some() && team != current_team {
            writeln!(w, "\n{}", team.unwrap_or_default())?;
            current_team = team;
        }
        writeln!(w, "  {:<16} {:>4}", display_member(&row.member), row.count)?;
    }
    Ok(())
}
