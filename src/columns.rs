//! Logical field access over [`RawRow`] records.
//!
//! The source data spells some column names with a trailing space. Each
//! logical field therefore carries an ordered alias list, probed first to
//! last; a present but empty cell falls through to the next alias.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    data::{parse_calendar_day, parse_price},
    rows::{Headers, RawRow},
};

pub const CITY_COLUMN: &str = "Metro Cities";
pub const FUEL_COLUMN: &str = "Products";
pub const DAY_COLUMN: &str = "Calendar Day";
pub const PRICE_COLUMN: &str = "Retail Selling Price (Rsp) Of Petrol And Diesel (UOM:INR/L(IndianRupeesperLitre)), Scaling Factor:1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    City,
    Fuel,
    Day,
    Price,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::City, Field::Fuel, Field::Day, Field::Price];

    pub fn name(self) -> &'static str {
        match self {
            Field::City => "city",
            Field::Fuel => "fuel",
            Field::Day => "day",
            Field::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnAliases {
    pub city: Vec<String>,
    pub fuel: Vec<String>,
    pub day: Vec<String>,
    pub price: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            city: vec![CITY_COLUMN.to_string(), format!("{CITY_COLUMN} ")],
            fuel: vec![FUEL_COLUMN.to_string(), format!("{FUEL_COLUMN} ")],
            day: vec![DAY_COLUMN.to_string(), format!("{DAY_COLUMN} ")],
            price: vec![PRICE_COLUMN.to_string()],
        }
    }
}

impl ColumnAliases {
    pub fn aliases(&self, field: Field) -> &[String] {
        match field {
            Field::City => &self.city,
            Field::Fuel => &self.fuel,
            Field::Day => &self.day,
            Field::Price => &self.price,
        }
    }

    /// The price column the aggregator reads by default.
    pub fn primary_price(&self) -> &str {
        self.price.first().map(String::as_str).unwrap_or(PRICE_COLUMN)
    }

    pub fn lookup<'a>(&self, row: &'a RawRow, field: Field) -> Option<&'a str> {
        first_present(row, self.aliases(field))
    }

    pub fn calendar_day(&self, row: &RawRow) -> Option<NaiveDate> {
        self.lookup(row, Field::Day)
            .and_then(|raw| parse_calendar_day(raw).ok())
    }

    /// The first price alias present in `headers`, or the primary price
    /// column when none is.
    pub fn price_field(&self, headers: &Headers) -> &str {
        self.price
            .iter()
            .find(|alias| headers.contains(alias))
            .map(String::as_str)
            .unwrap_or_else(|| self.primary_price())
    }

    /// Reads exactly `price_field`; an absent column or unparsable cell
    /// gives `None`.
    pub fn price(&self, row: &RawRow, price_field: &str) -> Option<f64> {
        row.get(price_field)
            .and_then(|value| parse_price(value).ok())
    }

    pub fn record<'a>(&self, row: &'a RawRow) -> RspRecord<'a> {
        RspRecord {
            city: self.lookup(row, Field::City),
            fuel: self.lookup(row, Field::Fuel),
            day: self.calendar_day(row),
            price: self
                .lookup(row, Field::Price)
                .and_then(|value| parse_price(value).ok()),
        }
    }

    /// Logical fields none of whose aliases appear in `headers`.
    pub fn missing_fields(&self, headers: &Headers) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.aliases(*field).iter().any(|alias| headers.contains(alias)))
            .collect()
    }
}

fn first_present<'a>(row: &'a RawRow, aliases: &[String]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| !value.is_empty())
}

/// Typed view of one RSP row.
#[derive(Debug, Clone, PartialEq)]
pub struct RspRecord<'a> {
    pub city: Option<&'a str>,
    pub fuel: Option<&'a str>,
    pub day: Option<NaiveDate>,
    pub price: Option<f64>,
}
