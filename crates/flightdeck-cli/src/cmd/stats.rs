//! `flightdeck stats`: count tables over the whole snapshot.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::Args;
use flightdeck_triage::Classifier;
use flightdeck_triage::aggregate::{Stats, Tally};

use super::{Context, SnapshotArgs, load_snapshot};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `flightdeck stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,
}

/// Execute `flightdeck stats`.
pub fn run_stats(args: &StatsArgs, ctx: &Context) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.source.snapshot, ctx.output)?;
    let classifier = Classifier::new(&ctx.project.board);
    let stats = Stats::compute(&snapshot.all(), &classifier);
    render_mode(ctx.output, &stats, render_stats_text, render_stats_human)
}

fn rows(tally: &Tally) -> Vec<(&str, usize)> {
    tally.iter().collect()
}

fn theme_rows(themes: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    themes.iter().map(|(k, v)| (k.as_str(), *v)).collect()
}

fn tables(stats: &Stats) -> [(&'static str, Vec<(&str, usize)>); 5] {
    [
        ("status", rows(&stats.by_status)),
        ("priority", rows(&stats.by_priority)),
        ("severity", rows(&stats.by_severity)),
        ("workflow", rows(&stats.workflow)),
        ("theme", theme_rows(&stats.themes)),
    ]
}

fn render_stats_text(stats: &Stats, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "total\t\t{}", stats.total)?;
    for (table, entries) in tables(stats) {
        for (key, count) in entries {
            writeln!(w, "{table}\t{key}\t{count}")?;
        }
    }
    Ok(())
}

fn render_stats_human(stats: &Stats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Ticket statistics")?;
    pretty_kv(w, "total", stats.total.to_string())?;
    for (table, entries) in tables(stats) {
        writeln!(w, "\nBy {table}:")?;
        if entries.is_empty() {
            writeln!(w, "  (none)")?;
        }
        for (key, count) in entries {
            writeln!(w, "  {key:<16} {count}")?;
        }
    }
    Ok(())
}
