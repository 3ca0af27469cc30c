//! `flightdeck plot`: scatter-plot projection of ticket metrics.

use std::io::{self, Write};

use clap::Args;
use flightdeck_analytics::{
    Field, FieldError, Filter, PlotSettings, Projection, ProjectionError, Record, project,
};
use tracing::debug;

use super::{Context, SnapshotArgs, load_snapshot};
use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `flightdeck plot`.
#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(flatten)]
    pub source: SnapshotArgs,

    /// Metric on the horizontal axis.
    #[arg(long, value_name = "FIELD")]
    pub x: Option<String>,

    /// Metric on the vertical axis.
    #[arg(long, value_name = "FIELD")]
    pub y: Option<String>,

    /// Metric sizing the circles (lower values draw larger).
    #[arg(long, value_name = "FIELD")]
    pub radius: Option<String>,

    /// Metric picking the palette colour.
    #[arg(long, value_name = "FIELD")]
    pub color: Option<String>,

    /// Add each ticket's direct dependencies to its metric values.
    #[arg(long)]
    pub deps: bool,

    /// Keep tickets matching FIELD=VALUE, FIELD>=VALUE or FIELD<=VALUE.
    #[arg(long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Factor widening the axis domains (1.0 = exact range).
    #[arg(long)]
    pub padding: Option<f64>,
}

impl PlotArgs {
    /// Overlay the flags on the configured settings.
    fn settings(&self, base: PlotSettings) -> Result<PlotSettings, FieldError> {
        let pick = |flag: Option<&str>, fallback: Field| {
            flag.map_or(Ok(fallback), Field::parse_numeric)
        };
        Ok(PlotSettings {
            x: pick(self.x.as_deref(), base.x)?,
            y: pick(self.y.as_deref(), base.y)?,
            radius: pick(self.radius.as_deref(), base.radius)?,
            color: pick(self.color.as_deref(), base.color)?,
            padding: self.padding.unwrap_or(base.padding),
            include_dependencies: self.deps || base.include_dependencies,
            ..base
        })
    }

    fn parsed_filters(&self) -> Result<Vec<Filter>, FieldError> {
        self.filters.iter().map(|raw| raw.parse()).collect()
    }
}

/// Execute `flightdeck plot`.
pub fn run_plot(args: &PlotArgs, ctx: &Context) -> anyhow::Result<()> {
    let (settings, filters) = match PlotSettings::from_config(&ctx.project.analytics)
        .and_then(|base| Ok((args.settings(base)?, args.parsed_filters()?)))
    {
        Ok(parsed) => parsed,
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    let snapshot = load_snapshot(&args.source.snapshot, ctx.output)?;
    let records: Vec<Record> = snapshot.tickets().iter().map(Record::from).collect();
    debug!(records = records.len(), filters = filters.len(), "plotting");

    match project(&records, &settings, &filters) {
        Ok(projection) => {
            render_mode(ctx.output, &projection, render_plot_text, render_plot_pretty)
        }
        Err(err) => fail_projection(ctx, err),
    }
}

pub(crate) fn fail_projection(ctx: &Context, err: ProjectionError) -> anyhow::Result<()> {
    render_error(ctx.output, &CliError::from(&err))?;
    Err(err.into())
}

fn render_plot_text(projection: &Projection, w: &mut dyn Write) -> io::Result<()> {
    for p in &projection.points {
        writeln!(
            w,
            "{}\t{:.1}\t{:.1}\t{:.0}\t{}\t{}",
            p.id, p.x, p.y, p.radius, p.color, p.summary
        )?;
    }
    Ok(())
}

fn render_plot_pretty(projection: &Projection, w: &mut dyn Write) -> io::Result<()> {
    let s = &projection.settings;
    pretty_section(w, "Analytics projection")?;
    pretty_kv(w, "x axis", s.x.as_str())?;
    pretty_kv(w, "y axis", s.y.as_str())?;
    pretty_kv(w, "radius", s.radius.as_str())?;
    pretty_kv(w, "color", s.color.as_str())?;
    let deps = if s.include_dependencies {
        "included"
    } else {
        "own only"
    };
    pretty_kv(w, "dependencies", deps)?;
    pretty_kv(
        w,
        "medians",
        format!("x={:.1} y={:.1}", projection.x_median, projection.y_median),
    )?;
    writeln!(w)?;
    writeln!(
        w,
        "  {:<8} {:>8} {:>8} {:>6} {:<8} {:>10} {:>10}  summary",
        "id", "x", "y", "r", "color", s.x.as_str(), s.y.as_str()
    )?;
    for p in &projection.points {
        writeln!(
            w,
            "  {:<8} {:>8.1} {:>8.1} {:>6.0} {:<8} {:>10} {:>10}  {}",
            p.id, p.x, p.y, p.radius, p.color, p.x_value, p.y_value, p.summary
        )?;
    }
    Ok(())
}
