use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{
    columns::{ColumnAliases, Field},
    rows::RawRow,
};

/// The three selections a chart is built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub city: String,
    pub fuel_type: String,
    pub year: i32,
}

impl FilterCriteria {
    pub fn new(city: impl Into<String>, fuel_type: impl Into<String>, year: i32) -> Self {
        Self {
            city: city.into(),
            fuel_type: fuel_type.into(),
            year,
        }
    }

    pub fn matches(&self, row: &RawRow, columns: &ColumnAliases) -> bool {
        let Some(city) = columns.lookup(row, Field::City) else {
            return false;
        };
        let Some(fuel) = columns.lookup(row, Field::Fuel) else {
            return false;
        };
        if normalize(city) != normalize(&self.city) || normalize(fuel) != normalize(&self.fuel_type)
        {
            return false;
        }
        columns
            .calendar_day(row)
            .is_some_and(|day| day.year() == self.year)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns the rows matching `criteria`, in input order.
pub fn filter_rows<'a, I>(rows: I, criteria: &FilterCriteria, columns: &ColumnAliases) -> Vec<&'a RawRow>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    rows.into_iter()
        .filter(|row| criteria.matches(row, columns))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::parse_document;

    const DOC: &str = "\
Metro Cities,Products,Calendar Day
Delhi,Petrol,2024-01-03
 DELHI ,petrol ,2024-02-03
Delhi,Diesel,2024-01-03
Mumbai,Petrol,2024-01-03
Delhi,Petrol,2023-12-31
Delhi,Petrol,someday
Delhi,Petrol,
";

    #[test]
    fn matches_all_three_predicates() {
        let rows = parse_document(DOC, b',').unwrap();
        let criteria = FilterCriteria::new("Delhi", "Petrol", 2024);
        let filtered = filter_rows(&rows, &criteria, &ColumnAliases::default());
        assert_eq!(filtered.len(), 2);
        assert!(std::ptr::eq(filtered[0], &rows[0]));
        assert!(std::ptr::eq(filtered[1], &rows[1]));
    }

    #[test]
    fn criteria_are_normalized_too() {
        let rows = parse_document(DOC, b',').unwrap();
        let criteria = FilterCriteria::new("  delhi", "PETROL ", 2023);
        let filtered = filter_rows(&rows, &criteria, &ColumnAliases::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].get("Calendar Day"), Some("2023-12-31"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let rows: Vec<RawRow> = Vec::new();
        let criteria = FilterCriteria::new("Chennai", "Diesel", 2020);
        assert!(filter_rows(&rows, &criteria, &ColumnAliases::default()).is_empty());
    }
}
