use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a calendar day. Numeric dates with the year last are read month
/// first, separated by `/` or `-`.
pub fn parse_calendar_day(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(anyhow!("Empty calendar day"));
    }
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(parsed.date());
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.date_naive());
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

/// Parses a price cell. Non-finite values are rejected so they can never
/// reach an average.
pub fn parse_price(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let parsed: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("Failed to parse '{trimmed}' as price"))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(anyhow!("Price '{trimmed}' is not a finite number"))
    }
}

/// `"Mar 2024"` style label for a zero-based month index.
pub fn month_label(year: i32, month0: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month0 + 1, 1) {
        Some(first) => format!("{} {:04}", first.format("%b"), first.year()),
        None => format!("{:02} {year:04}", month0 + 1),
    }
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
