//! One projection pass: filter, summarize, scale, and lay out points.

use std::collections::BTreeMap;

use flightdeck_core::config::AnalyticsConfig;
use flightdeck_core::{Status, TicketId};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::bounds::{self, Bounds};
use crate::error::{FieldError, ProjectionError};
use crate::field::Field;
use crate::filter::{Filter, apply_filters};
use crate::record::{Record, WorkingSet};
use crate::scale::{LinearScale, PowScale};
use crate::visual;

/// Which metric drives each visual channel, and the canvas size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSettings {
    pub x: Field,
    pub y: Field,
    pub radius: Field,
    pub color: Field,
    pub padding: f64,
    pub include_dependencies: bool,
    pub width: f64,
    pub height: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            x: Field::Revenue,
            y: Field::Complexity,
            radius: Field::Dependency,
            color: Field::Risk,
            padding: 1.0,
            include_dependencies: false,
            width: 1280.0,
            height: 640.0,
        }
    }
}

impl PlotSettings {
    /// Resolve the `[analytics]` section's field names.
    ///
    /// # Errors
    ///
    /// [`FieldError`] if any channel names an unknown or categorical field.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self, FieldError> {
        Ok(Self {
            x: Field::parse_numeric(&config.x_axis)?,
            y: Field::parse_numeric(&config.y_axis)?,
            radius: Field::parse_numeric(&config.radius)?,
            color: Field::parse_numeric(&config.color)?,
            padding: config.padding,
            include_dependencies: config.include_dependencies,
            width: config.width,
            height: config.height,
        })
    }
}

/// A positioned circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: TicketId,
    pub summary: String,
    pub assignee: String,
    pub status: Status,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: &'static str,
    /// Metric values behind `x` and `y`, after dependency propagation.
    pub x_value: f64,
    pub y_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub settings: PlotSettings,
    /// Per numeric field, over the filtered set.
    pub bounds: BTreeMap<Field, Bounds>,
    /// Larger circles first so smaller ones draw on top.
    pub points: Vec<Point>,
    /// Pixel position of the x-field average.
    pub x_median: f64,
    /// Pixel position of the y-field average.
    pub y_median: f64,
}

/// Project `records` onto the plot described by `settings`.
///
/// Dependencies resolve against the whole record set, before filtering, so
/// a filtered-out dependency still contributes its value. Bounds and
/// scales cover only the records passing `filters`.
///
/// # Errors
///
/// [`ProjectionError::Bounds`] when no record passes the filters or the
/// padding factor is unusable.
#[instrument(skip_all, fields(records = records.len(), filters = filters.len()))]
pub fn project(
    records: &[Record],
    settings: &PlotSettings,
    filters: &[Filter],
) -> Result<Projection, ProjectionError> {
    let universe = WorkingSet::new(records);
    let all: Vec<&Record> = records.iter().collect();
    let kept = apply_filters(&all, filters);

    let bounds = bounds::compute_all(&kept, settings.padding)?;
    let axis = |field: Field| bounds.get(&field).ok_or(FieldError::NotNumeric(field));
    let x_bounds = axis(settings.x)?;
    let y_bounds = axis(settings.y)?;
    let x_scale = PowScale::x_axis(x_bounds, settings.width);
    let y_scale = LinearScale::y_axis(y_bounds, settings.height);

    let mut points: Vec<Point> = kept
        .iter()
        .map(|record| {
            let x_value =
                universe.value_with_dependencies(record, settings.x, settings.include_dependencies);
            let y_value =
                universe.value_with_dependencies(record, settings.y, settings.include_dependencies);
            let gate = universe.value_with_dependencies(
                record,
                settings.radius,
                settings.include_dependencies,
            );
            Point {
                id: record.id.clone(),
                summary: record.summary.clone(),
                assignee: record.assignee.clone(),
                status: record.status,
                x: x_scale.apply(x_value),
                y: y_scale.apply(y_value),
                radius: visual::radius(gate, record.value(settings.radius)),
                color: visual::color(record.value(settings.color)),
                x_value,
                y_value,
            }
        })
        .collect();
    points.sort_by(|a, b| b.radius.total_cmp(&a.radius));

    let x_median = x_scale.apply(x_bounds.avg);
    let y_median = y_scale.apply(y_bounds.avg);

    debug!(
        kept = kept.len(),
        dropped = records.len() - kept.len(),
        exponent = x_scale.exponent,
        "projected points"
    );

    Ok(Projection {
        settings: settings.clone(),
        bounds,
        points,
        x_median,
        y_median,
    })
}
