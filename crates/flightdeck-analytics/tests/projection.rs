//! Projection of a realistic ticket export, plus layout invariants over
//! random record sets.

use flightdeck_analytics::visual::PALETTE;
use flightdeck_analytics::{
    Bounds, Field, Filter, PlotSettings, Projection, Record, WorkingSet, project, unique_values,
};
use flightdeck_core::{Snapshot, Status, TicketId};
use proptest::prelude::*;

const PORTFOLIO: &str = include_str!("fixtures/portfolio.json");

fn records() -> Vec<Record> {
    let snapshot = Snapshot::from_json_str(PORTFOLIO).unwrap();
    snapshot.tickets().iter().map(Record::from).collect()
}

fn order(projection: &Projection) -> Vec<u64> {
    projection.points.iter().filter_map(|p| p.id.as_number()).collect()
}

fn point(projection: &Projection, id: u64) -> &flightdeck_analytics::Point {
    projection.points.iter().find(|p| p.id == TicketId::Num(id)).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn default_plot_of_portfolio() {
    let projection = project(&records(), &PlotSettings::default(), &[]).unwrap();

    assert_eq!(order(&projection), vec![102, 101, 104, 103, 105]);

    let revenue = &projection.bounds[&Field::Revenue];
    assert!(close(revenue.min, 0.0));
    assert!(close(revenue.max, 12000.0));
    assert!(close(revenue.avg, 3260.0));

    let ticket = point(&projection, 105);
    assert!(close(ticket.radius, 0.0));
    assert_eq!(ticket.color, "#bbb");
    assert!(close(ticket.x, 20.0));

    assert!(close(point(&projection, 101).x, 1180.0));
    assert_eq!(point(&projection, 103).color, "#d62728");
    assert!(close(point(&projection, 104).y, 600.0));
    assert!(close(point(&projection, 103).y, 100.0));
}

#[test]
fn medians_sit_at_the_averages() {
    let projection = project(&records(), &PlotSettings::default(), &[]).unwrap();
    let complexity = &projection.bounds[&Field::Complexity];
    // 4 + 2 + 6 + 1 + 3 over five tickets.
    assert!(close(complexity.avg, 3.2));
    let expected_y = 600.0 - (3.2 - 1.0) / 5.0 * 500.0;
    assert!(close(projection.y_median, expected_y));
    assert!(projection.x_median > 20.0 && projection.x_median < 1180.0);
}

#[test]
fn dependency_propagation_is_one_level() {
    let settings = PlotSettings {
        include_dependencies: true,
        ..PlotSettings::default()
    };
    let projection = project(&records(), &settings, &[]).unwrap();

    // 101 and 103 depend on each other; each adds the other's own value once.
    assert!(close(point(&projection, 101).x_value, 12500.0));
    assert!(close(point(&projection, 103).x_value, 12500.0));
    // Unknown dependency ids contribute nothing.
    assert!(close(point(&projection, 104).x_value, 800.0));
}

#[test]
fn filters_narrow_points_and_bounds() {
    let filters: Vec<Filter> = ["assignee=alice"].iter().map(|f| f.parse().unwrap()).collect();
    let projection = project(&records(), &PlotSettings::default(), &filters).unwrap();
    assert_eq!(order(&projection), vec![101, 104]);
    assert!(close(projection.bounds[&Field::Revenue].min, 800.0));

    let risky: Vec<Filter> = vec!["risk=2".parse().unwrap()];
    let projection = project(&records(), &PlotSettings::default(), &risky).unwrap();
    assert_eq!(order(&projection), vec![102, 104]);
}

#[test]
fn padding_applies_to_projected_bounds() {
    let settings = PlotSettings {
        padding: 1.5,
        ..PlotSettings::default()
    };
    let projection = project(&records(), &settings, &[]).unwrap();
    let complexity = &projection.bounds[&Field::Complexity];
    assert!(close(complexity.max, 9.0));
    assert!(close(complexity.min, 1.0 / 1.5));
}

#[test]
fn filter_options_per_field() {
    let records = records();
    assert_eq!(
        unique_values(&records, Field::Assignee),
        vec!["alice", "bob", "carol"]
    );
    assert_eq!(unique_values(&records, Field::Risk), vec!["1", "2", "3", "5"]);
}

#[test]
fn projection_json_shape() {
    let projection = project(&records(), &PlotSettings::default(), &[]).unwrap();
    let json = serde_json::to_value(&projection).unwrap();
    assert_eq!(json["settings"]["x"], "revenue");
    assert_eq!(json["bounds"]["complexity"]["max"], 6.0);
    assert_eq!(json["points"][0]["id"], 102);
    assert_eq!(json["points"][0]["color"], "#2ca02c");
    assert!(json["x_median"].is_number());
}

fn arb_rating() -> impl Strategy<Value = Option<f64>> {
    prop::option::of(prop_oneof![
        4 => (1u8..=6).prop_map(f64::from),
        1 => 0.0f64..8.0,
    ])
}

fn arb_record(id: u64, max_id: u64) -> impl Strategy<Value = Record> {
    (
        prop::option::of(-500.0f64..20_000.0),
        arb_rating(),
        arb_rating(),
        arb_rating(),
        prop::collection::vec(1..=max_id + 2, 0..3),
        prop_oneof![Just("alice"), Just("bob")],
    )
        .prop_map(move |(revenue, complexity, dependency, risk, depends, assignee)| Record {
            id: TicketId::Num(id),
            summary: format!("ticket {id}"),
            assignee: assignee.to_string(),
            status: Status::Assigned,
            revenue,
            complexity,
            dependency,
            risk,
            depends: depends.into_iter().map(TicketId::Num).collect(),
        })
}

fn arb_records(max: u64) -> impl Strategy<Value = Vec<Record>> {
    (1..=max).prop_flat_map(|n| (1..=n).map(|id| arb_record(id, n)).collect::<Vec<_>>())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn padded_bounds_contain_every_value(records in arb_records(30), padding in 1.0f64..4.0) {
        for field in Field::NUMERIC {
            let bounds = Bounds::compute(&records, field, padding).unwrap();
            for record in &records {
                prop_assert!(bounds.min <= record.value(field));
                prop_assert!(bounds.max >= record.value(field));
            }
            prop_assert!(bounds.unique.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn points_stay_on_canvas(records in arb_records(30), deps in any::<bool>()) {
        let settings = PlotSettings { include_dependencies: deps, ..PlotSettings::default() };
        let projection = project(&records, &settings, &[]).unwrap();

        prop_assert_eq!(projection.points.len(), records.len());
        for p in &projection.points {
            prop_assert!((20.0..=1180.0).contains(&p.x));
            prop_assert!((100.0..=600.0).contains(&p.y));
            prop_assert!(p.radius >= 0.0);
            prop_assert!(PALETTE.contains(&p.color));
        }
        prop_assert!(projection.points.windows(2).all(|w| w[0].radius >= w[1].radius));
    }

    #[test]
    fn propagation_never_lowers_non_negative_values(records in arb_records(30)) {
        let set = WorkingSet::new(&records);
        for record in &records {
            let own = set.value_with_dependencies(record, Field::Complexity, false);
            prop_assert_eq!(own, record.value(Field::Complexity));
            prop_assert!(set.value_with_dependencies(record, Field::Complexity, true) >= own);
        }
    }

    #[test]
    fn every_point_passes_the_filters(records in arb_records(30), risk in 1u8..=6) {
        let filters = vec![Filter::new(Field::Risk, risk.to_string())];
        match project(&records, &PlotSettings::default(), &filters) {
            Ok(projection) => {
                for p in &projection.points {
                    let record = records.iter().find(|r| r.id == p.id).unwrap();
                    prop_assert!(filters[0].matches(record));
                }
            }
            Err(err) => prop_assert_eq!(err.error_code(), flightdeck_core::ErrorCode::EmptyBoundsSet),
        }
    }
}
