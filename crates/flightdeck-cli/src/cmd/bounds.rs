//! `flightdeck bounds`: per-metric ranges over the whole snapshot.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::Args;
use flightdeck_analytics::bounds::compute_all;
use flightdeck_analytics::{Bounds, Field, Record, unique_values};
use serde::Serialize;

use super::plot::fail_projection;
use super::{Context, SnapshotArgs, load_snapshot};
use crate::output::{pretty_section, render_mode};

/// Arguments for `flightdeck bounds`.
#[derive(Args, Debug)]
pub struct BoundsArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,

    /// Factor widening each domain; defaults to the configured padding.
    #[arg(long)]
    pub padding: Option<f64>,
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    padding: f64,
    bounds: BTreeMap<Field, Bounds>,
    /// Filter choices for the categorical fields.
    options: BTreeMap<Field, Vec<String>>,
}

/// Execute `flightdeck bounds`.
pub fn run_bounds(args: &BoundsArgs, ctx: &Context) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.source.snapshot, ctx.output)?;
    let records: Vec<Record> = snapshot.tickets().iter().map(Record::from).collect();
    let refs: Vec<&Record> = records.iter().collect();
    let padding = args.padding.unwrap_or(ctx.project.analytics.padding);

    let bounds = match compute_all(&refs, padding) {
        Ok(bounds) => bounds,
        Err(err) => return fail_projection(ctx, err.into()),
    };
    let options = [Field::Assignee, Field::Status]
        .into_iter()
        .map(|field| (field, unique_values(&records, field)))
        .collect();

    let payload = BoundsReport {
        padding,
        bounds,
        options,
    };
    render_mode(ctx.output, &payload, render_bounds_text, render_bounds_pretty)
}

fn render_bounds_text(report: &BoundsReport, w: &mut dyn Write) -> io::Result<()> {
    for (field, b) in &report.bounds {
        writeln!(w, "{field}\t{}\t{}\t{}\t{}", b.min, b.max, b.avg, b.unique.len())?;
    }
    Ok(())
}

fn render_bounds_pretty(report: &BoundsReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Metric bounds (padding {})", report.padding))?;
    writeln!(
        w,
        "  {:<12} {:>10} {:>10} {:>10} {:>7}",
        "field", "min", "max", "avg", "unique"
    )?;
    for (field, b) in &report.bounds {
        writeln!(
            w,
            "  {:<12} {:>10.2} {:>10.2} {:>10.2} {:>7}",
            field.as_str(),
            b.min,
            b.max,
            b.avg,
            b.unique.len()
        )?;
    }
    for (field, values) in &report.options {
        writeln!(w, "\n{field} options: {}", values.join(", "))?;
    }
    Ok(())
}
