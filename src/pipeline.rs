//! Pipeline composition and selection handling.
//!
//! A run is `load -> filter -> aggregate`. [`SelectionSession`] turns
//! selection changes into numbered runs and publishes only the result of the
//! most recently requested run, so a slow load that finishes late can never
//! overwrite a newer chart.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};

use crate::{
    aggregate::{ChartPoint, MonthlyAccumulator},
    columns::ColumnAliases,
    filter::{FilterCriteria, filter_rows},
    rows::{DataSource, RawRow, load_rows},
};

/// Parsed rows together with the column aliases used to read them.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<RawRow>,
    columns: ColumnAliases,
}

impl Dataset {
    pub fn new(rows: Vec<RawRow>, columns: ColumnAliases) -> Self {
        if let Some(first) = rows.first() {
            for field in columns.missing_fields(first.headers()) {
                warn!(
                    "Dataset header has no column for '{}' (looked for {:?})",
                    field.name(),
                    columns.aliases(field)
                );
            }
        }
        Self { rows, columns }
    }

    /// Fetches `source`; a failed fetch yields an empty dataset.
    pub fn load(source: &DataSource, columns: ColumnAliases) -> Self {
        Self::new(load_rows(source), columns)
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnAliases {
        &self.columns
    }

    pub fn chart(&self, criteria: &FilterCriteria) -> ChartOutcome {
        run_pipeline(&self.rows, criteria, &self.columns)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub criteria: FilterCriteria,
    pub matched_rows: usize,
    pub skipped_rows: usize,
    pub points: Vec<ChartPoint>,
}

impl ChartOutcome {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn run_pipeline(
    rows: &[RawRow],
    criteria: &FilterCriteria,
    columns: &ColumnAliases,
) -> ChartOutcome {
    let filtered = filter_rows(rows, criteria, columns);
    info!(
        "Filtered {} of {} row(s) for {} / {} / {}",
        filtered.len(),
        rows.len(),
        criteria.city,
        criteria.fuel_type,
        criteria.year
    );
    let price_field = rows
        .first()
        .map_or_else(|| columns.primary_price(), |row| columns.price_field(row.headers()));
    debug!("Averaging prices from column '{price_field}'");
    let mut accumulator = MonthlyAccumulator::new();
    for row in &filtered {
        accumulator.ingest(row, price_field, columns);
    }
    let skipped_rows = accumulator.skipped();
    if skipped_rows > 0 {
        debug!("Skipped {skipped_rows} row(s) without a usable price or date");
    }
    let points = accumulator.into_points();
    debug!("Computed {} monthly average(s)", points.len());
    ChartOutcome {
        criteria: criteria.clone(),
        matched_rows: filtered.len(),
        skipped_rows,
        points,
    }
}

/// Identifies one requested pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Published,
    Stale,
}

/// A change to one of the three selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    City(String),
    Fuel(String),
    Year(i32),
}

impl FromStr for SelectionEvent {
    type Err = anyhow::Error;

    /// Parses `city=<name>`, `fuel=<name>` or `year=<yyyy>`.
    fn from_str(input: &str) -> Result<Self> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected '<selection>=<value>', got '{}'", input.trim()))?;
        let value = value.trim();
        if value.is_empty() {
            bail!("Missing value for '{}'", key.trim());
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(SelectionEvent::City(value.to_string())),
            "fuel" | "product" => Ok(SelectionEvent::Fuel(value.to_string())),
            "year" => {
                let year = value
                    .parse()
                    .with_context(|| format!("Failed to parse '{value}' as year"))?;
                Ok(SelectionEvent::Year(year))
            }
            other => Err(anyhow!("Unknown selection '{other}'")),
        }
    }
}

/// Current selection plus the last published chart.
#[derive(Debug)]
pub struct SelectionSession {
    criteria: FilterCriteria,
    issued: u64,
    published: Option<(Ticket, ChartOutcome)>,
}

impl SelectionSession {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            issued: 0,
            published: None,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Applies a selection change and issues a ticket for the run it
    /// triggers. The returned criteria are what that run must use.
    pub fn select(&mut self, event: SelectionEvent) -> (Ticket, FilterCriteria) {
        match event {
            SelectionEvent::City(city) => self.criteria.city = city,
            SelectionEvent::Fuel(fuel) => self.criteria.fuel_type = fuel,
            SelectionEvent::Year(year) => self.criteria.year = year,
        }
        (self.begin(), self.criteria.clone())
    }

    /// Issues a ticket for a run over the current selection. Every earlier
    /// ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn latest(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Publishes `outcome` if `ticket` is the most recently issued one.
    pub fn complete(&mut self, ticket: Ticket, outcome: ChartOutcome) -> Completion {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale result #{} (latest is #{})",
                ticket.0, self.issued
            );
            return Completion::Stale;
        }
        self.published = Some((ticket, outcome));
        Completion::Published
    }

    pub fn published(&self) -> Option<&ChartOutcome> {
        self.published.as_ref().map(|(_, outcome)| outcome)
    }

    /// True once the latest issued run has been published.
    pub fn is_settled(&self) -> bool {
        match (&self.published, self.latest()) {
            (Some((ticket, _)), Some(latest)) => *ticket == latest,
            (None, None) => true,
            _ => false,
        }
    }
}
