//! Property checks for the filter and aggregation stages.

mod common;

use common::{PRICE_HEADER, rsp_document};
use proptest::prelude::*;
use rsp_dashboard::{
    aggregate::aggregate_monthly,
    columns::ColumnAliases,
    data::month_label,
    filter::{FilterCriteria, filter_rows},
    rows::parse_document,
};

const CITIES: &[&str] = &["Delhi", "Mumbai", "Kolkata", "Chennai"];
const FUELS: &[&str] = &["Petrol", "Diesel"];

#[derive(Debug, Clone)]
struct GeneratedRow {
    city: String,
    fuel: String,
    day: String,
    price: String,
}

fn decorate(value: &'static str) -> impl Strategy<Value = String> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(move |(upper, lead, trail)| {
        let mut text = if upper {
            value.to_uppercase()
        } else {
            value.to_lowercase()
        };
        if lead {
            text.insert(0, ' ');
        }
        if trail {
            text.push(' ');
        }
        text
    })
}

fn row_strategy() -> impl Strategy<Value = GeneratedRow> {
    let city = prop::sample::select(CITIES).prop_flat_map(decorate);
    let fuel = prop::sample::select(FUELS).prop_flat_map(decorate);
    let day = prop_oneof![
        9 => (2017i32..=2025, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        1 => Just("unknown".to_string()),
    ];
    let price = prop_oneof![
        9 => (7000u32..12000).prop_map(|cents| format!("{}.{:02}", cents / 100, cents % 100)),
        1 => Just("n/a".to_string()),
    ];
    (city, fuel, day, price).prop_map(|(city, fuel, day, price)| GeneratedRow {
        city,
        fuel,
        day,
        price,
    })
}

fn document(rows: &[GeneratedRow]) -> String {
    let tuples = rows
        .iter()
        .map(|r| (r.city.as_str(), r.fuel.as_str(), r.day.as_str(), r.price.as_str()))
        .collect::<Vec<_>>();
    rsp_document(&tuples)
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::sample::select(CITIES),
        prop::sample::select(FUELS),
        2017i32..=2025,
    )
        .prop_map(|(city, fuel, year)| FilterCriteria::new(city, fuel, year))
}

proptest! {
    #[test]
    fn filter_keeps_exactly_the_matching_rows(
        rows in prop::collection::vec(row_strategy(), 0..60),
        criteria in criteria_strategy(),
    ) {
        let parsed = parse_document(&document(&rows), b',').unwrap();
        prop_assert_eq!(parsed.len(), rows.len());
        let columns = ColumnAliases::default();
        let filtered = filter_rows(&parsed, &criteria, &columns);

        let expected = rows
            .iter()
            .filter(|r| {
                r.city.trim().eq_ignore_ascii_case(&criteria.city)
                    && r.fuel.trim().eq_ignore_ascii_case(&criteria.fuel_type)
                    && r.day.get(..4) == Some(criteria.year.to_string().as_str())
            })
            .count();
        prop_assert_eq!(filtered.len(), expected);

        let again = filter_rows(filtered.iter().copied(), &criteria, &columns);
        prop_assert_eq!(again, filtered);
    }

    #[test]
    fn every_point_is_finite_and_months_are_unique_and_ascending(
        rows in prop::collection::vec(row_strategy(), 0..80),
    ) {
        let parsed = parse_document(&document(&rows), b',').unwrap();
        let points = aggregate_monthly(&parsed, PRICE_HEADER, &ColumnAliases::default());

        let mut months = rows
            .iter()
            .filter(|r| r.day != "unknown" && r.price != "n/a")
            .map(|r| r.day[..7].to_string())
            .collect::<Vec<_>>();
        months.sort();
        months.dedup();
        let expected_labels = months
            .iter()
            .map(|month| {
                let year: i32 = month[..4].parse().unwrap();
                let month0: u32 = month[5..7].parse::<u32>().unwrap() - 1;
                month_label(year, month0)
            })
            .collect::<Vec<_>>();
        let labels = points.iter().map(|p| p.label.clone()).collect::<Vec<_>>();
        prop_assert_eq!(labels, expected_labels);

        for point in &points {
            prop_assert!(point.value.is_finite());
            prop_assert!((70.0..120.0).contains(&point.value));
        }
    }
}
