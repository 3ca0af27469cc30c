//! `flightdeck board`: the named ticket lists of the dashboard.

use std::io::{self, Write};

use chrono::{Local, NaiveDate};
use clap::Args;
use flightdeck_core::{Collection, Ticket};
use flightdeck_triage::{BoardContext, BoardMode, Dashboard};

use super::{Context, SnapshotArgs, load_snapshot};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `flightdeck board`.
#[derive(Args, Debug)]
pub struct BoardArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,

    /// Overview lists only (`list`) or with kanban columns (`board`).
    #[arg(long, default_value = "list")]
    pub mode: BoardMode,

    /// Day used for "changed today"; defaults to the local date.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,
}

/// Execute `flightdeck board`.
pub fn run_board(args: &BoardArgs, ctx: &Context) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.source.snapshot, ctx.output)?;
    let context = BoardContext {
        login: ctx.login.clone(),
        today: args.today.unwrap_or_else(|| Local::now().date_naive()),
        mode: args.mode,
    };
    let dashboard = Dashboard::build(&snapshot, &context, &ctx.project);
    render_mode(ctx.output, &dashboard, render_board_text, render_board_pretty)
}

pub(crate) fn ticket_line(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    writeln!(
        w,
        "  #{:<7} {:<13} {:<12} {}",
        ticket.id,
        ticket.status.as_str(),
        ticket.assignee,
        ticket.summary
    )
}

pub(crate) fn id_list(collection: &Collection<'_>) -> String {
    collection
        .ids()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn render_board_text(dashboard: &Dashboard<'_>, w: &mut dyn Write) -> io::Result<()> {
    for (name, collection) in dashboard.named_collections() {
        writeln!(w, "{name}\t{}\t{}", collection.len(), id_list(collection))?;
    }
    writeln!(w, "iTotal\t{}", dashboard.total)?;
    writeln!(w, "snapshotHash\t{}", dashboard.snapshot_hash)
}

fn render_board_pretty(dashboard: &Dashboard<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Dashboard")?;
    pretty_kv(w, "tickets", dashboard.total.to_string())?;
    pretty_kv(w, "snapshot", &dashboard.snapshot_hash)?;

    for (name, collection) in dashboard.named_collections() {
        writeln!(w)?;
        writeln!(w, "{name} ({})", collection.len())?;
        if collection.is_empty() {
            writeln!(w, "  (none)")?;
        }
        for ticket in collection {
            ticket_line(w, ticket)?;
        }
    }
    Ok(())
}
