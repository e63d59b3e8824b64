//! Text renderings of a chart for the terminal, JSON and CSV consumers.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    aggregate::ChartPoint,
    pipeline::ChartOutcome,
    table::{self, Align},
};

pub const NO_DATA_MESSAGE: &str = "No matching data found for this selection.";
pub const CHART_TITLE: &str = "Monthly Average Fuel RSP";
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    Table,
    #[default]
    Bars,
    Json,
    Csv,
}

pub fn write_chart<W: Write>(writer: &mut W, outcome: &ChartOutcome, format: OutputFormat) -> Result<()> {
    let written = match format {
        OutputFormat::Table => write_text(writer, &render_table(outcome)),
        OutputFormat::Bars => write_text(writer, &render_bars(outcome)),
        OutputFormat::Json => write_json(writer, outcome),
        OutputFormat::Csv => write_csv(writer, &outcome.points),
    };
    written.context("Writing chart output")?;
    writer.flush().context("Flushing chart output")
}

fn write_text<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    writer.write_all(text.as_bytes())?;
    Ok(())
}

fn heading(outcome: &ChartOutcome) -> String {
    let criteria = &outcome.criteria;
    format!(
        "{CHART_TITLE}: {} / {} / {}\n",
        criteria.city, criteria.fuel_type, criteria.year
    )
}

pub fn render_table(outcome: &ChartOutcome) -> String {
    let mut output = heading(outcome);
    if outcome.is_empty() {
        output.push_str(NO_DATA_MESSAGE);
        output.push('\n');
        return output;
    }
    let headers = vec!["month".to_string(), "avg_rsp_inr_per_litre".to_string()];
    let rows = outcome
        .points
        .iter()
        .map(|point| vec![point.label.clone(), format!("{:.2}", point.value)])
        .collect::<Vec<_>>();
    output.push_str(&table::render_table(
        &headers,
        &rows,
        &[Align::Left, Align::Right],
    ));
    output
}

/// Horizontal bars scaled so the largest average spans the full width.
pub fn render_bars(outcome: &ChartOutcome) -> String {
    let mut output = heading(outcome);
    if outcome.is_empty() {
        output.push_str(NO_DATA_MESSAGE);
        output.push('\n');
        return output;
    }
    let label_width = outcome
        .points
        .iter()
        .map(|p| table::display_width(&p.label))
        .max()
        .unwrap_or(0);
    let max = outcome
        .points
        .iter()
        .map(|p| p.value)
        .fold(0.0_f64, f64::max);
    let bar_width = BAR_WIDTH;
    for point in &outcome.points {
        let length = bar_length(point.value, max);
        output.push_str(&format!(
            "{:<label_width$}  {:<bar_width$}  \u{20b9}{:.2}/L\n",
            point.label,
            "#".repeat(length),
            point.value,
        ));
    }
    output
}

fn bar_length(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let scaled = (value / max * BAR_WIDTH as f64).round() as usize;
    scaled.clamp(1, BAR_WIDTH)
}

#[derive(Serialize)]
struct JsonChart<'a> {
    title: &'static str,
    city: &'a str,
    fuel: &'a str,
    year: i32,
    matched_rows: usize,
    points: &'a [ChartPoint],
}

fn write_json<W: Write>(writer: &mut W, outcome: &ChartOutcome) -> Result<()> {
    let chart = JsonChart {
        title: CHART_TITLE,
        city: &outcome.criteria.city,
        fuel: &outcome.criteria.fuel_type,
        year: outcome.criteria.year,
        matched_rows: outcome.matched_rows,
        points: &outcome.points,
    };
    serde_json::to_writer_pretty(&mut *writer, &chart)?;
    writeln!(writer)?;
    Ok(())
}

fn write_csv<W: Write>(writer: &mut W, points: &[ChartPoint]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["label", "value"])?;
    for point in points {
        let value = format!("{:.2}", point.value);
        csv_writer.write_record([point.label.as_str(), value.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
