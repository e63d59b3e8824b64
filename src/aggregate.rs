//! Monthly averaging of filtered rows into chart points.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{
    columns::ColumnAliases,
    data::{month_label, round_to_cents},
    rows::RawRow,
};

/// Calendar month with a zero-based month index. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month0: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthGroup {
    pub total: f64,
    pub count: usize,
}

impl MonthGroup {
    fn add(&mut self, price: f64) {
        self.total += price;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        self.total / self.count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Running per-month totals; groups exist only for months seen.
#[derive(Debug, Default)]
pub struct MonthlyAccumulator {
    groups: BTreeMap<MonthKey, MonthGroup>,
    skipped: usize,
}

impl MonthlyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row. Only `price_field` is read for the price; rows without
    /// a usable price there or a usable date are counted as skipped.
    pub fn ingest(&mut self, row: &RawRow, price_field: &str, columns: &ColumnAliases) {
        let (Some(price), Some(day)) = (columns.price(row, price_field), columns.calendar_day(row))
        else {
            self.skipped += 1;
            return;
        };
        let key = MonthKey {
            year: day.year(),
            month0: day.month0(),
        };
        self.groups.entry(key).or_default().add(price);
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_points(self) -> Vec<ChartPoint> {
        self.groups
            .into_iter()
            .map(|(key, group)| ChartPoint {
                label: month_label(key.year, key.month0),
                value: round_to_cents(group.mean()),
            })
            .collect()
    }
}

/// Monthly averages of `price_field`, ascending by year then month.
pub fn aggregate_monthly<'a, I>(rows: I, price_field: &str, columns: &ColumnAliases) -> Vec<ChartPoint>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut accumulator = MonthlyAccumulator::new();
    for row in rows {
        accumulator.ingest(row, price_field, columns);
    }
    accumulator.into_points()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::parse_document;

    fn rows(body: &str) -> Vec<RawRow> {
        parse_document(&format!("Calendar Day,Price\n{body}"), b',').unwrap()
    }

    #[test]
    fn october_sorts_after_february() {
        let rows = rows("2024-10-01,10\n2024-02-01,20\n2024-12-05,30\n");
        let points = aggregate_monthly(&rows, "Price", &ColumnAliases::default());
        let labels = points.iter().map(|p| p.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["Feb 2024", "Oct 2024", "Dec 2024"]);
    }

    #[test]
    fn rounding_does_not_affect_grouping() {
        let rows = rows("2024-03-01,1.005\n2024-03-02,1.005\n2024-03-03,1.006\n");
        let mut accumulator = MonthlyAccumulator::new();
        for row in &rows {
            accumulator.ingest(row, "Price", &ColumnAliases::default());
        }
        assert_eq!(accumulator.skipped(), 0);
        let points = accumulator.into_points();
        assert_eq!(points, vec![ChartPoint { label: "Mar 2024".into(), value: 1.01 }]);
    }

    #[test]
    fn skipped_rows_are_counted() {
        let rows = rows("2024-01-01,abc\nnever,5\n2024-01-02,7\n");
        let mut accumulator = MonthlyAccumulator::new();
        for row in &rows {
            accumulator.ingest(row, "Price", &ColumnAliases::default());
        }
        assert_eq!(accumulator.skipped(), 2);
        assert_eq!(accumulator.into_points()[0].value, 7.0);
    }

    #[test]
    fn empty_or_absent_price_field_is_not_replaced_by_another_column() {
        let text = format!(
            "Calendar Day,Other Price,\"{}\"\n2024-01-05,,50.0\n",
            crate::columns::PRICE_COLUMN
        );
        let rows = parse_document(&text, b',').unwrap();
        let columns = ColumnAliases::default();
        assert!(aggregate_monthly(&rows, "Other Price", &columns).is_empty());
        assert!(aggregate_monthly(&rows, "No Such Column", &columns).is_empty());
        assert_eq!(
            aggregate_monthly(&rows, crate::columns::PRICE_COLUMN, &columns),
            vec![ChartPoint { label: "Jan 2024".into(), value: 50.0 }]
        );
    }
}
