pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod io_utils;
pub mod pipeline;
pub mod render;
pub mod rows;
pub mod table;
pub mod watch;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, info};

use crate::{
    cli::{ChartArgs, Cli, Commands, InitConfigArgs, PreviewArgs, SourceArgs},
    config::DashboardConfig,
    pipeline::Dataset,
    rows::DataSource,
    table::Align,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("rsp_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Commands::Chart(args) => handle_chart(&config, &args),
        Commands::Watch(args) => {
            let source = resolve_source(&config, &args.source)?;
            watch::execute(&config, source, &args)
        }
        Commands::Options => handle_options(&config),
        Commands::Preview(args) => handle_preview(&config, &args),
        Commands::InitConfig(args) => handle_init_config(&args),
    }
}

pub fn resolve_source(config: &DashboardConfig, args: &SourceArgs) -> Result<DataSource> {
    let path = args.input.clone().unwrap_or_else(|| config.dataset.clone());
    let delimiter = match args.delimiter {
        Some(delimiter) => Some(delimiter),
        None => config.delimiter_byte()?,
    };
    let encoding =
        io_utils::resolve_encoding(args.input_encoding.as_deref().or(config.encoding.as_deref()))?;
    Ok(DataSource::new(path, delimiter, encoding))
}

fn handle_chart(config: &DashboardConfig, args: &ChartArgs) -> Result<()> {
    let defaults = config.default_criteria();
    let criteria = config.resolve_criteria(
        args.city.as_deref().unwrap_or(&defaults.city),
        args.fuel.as_deref().unwrap_or(&defaults.fuel_type),
        args.year.unwrap_or(defaults.year),
    )?;
    let source = resolve_source(config, &args.source)?;
    info!(
        "Charting '{}' with delimiter '{}'",
        source.path.display(),
        printable_delimiter(source.delimiter)
    );
    let dataset = Dataset::load(&source, config.columns.clone());
    let outcome = dataset.chart(&criteria);
    let mut writer = io_utils::open_output(args.output.as_deref())?;
    render::write_chart(&mut writer, &outcome, args.format)?;
    info!(
        "Charted {} month(s) from {} matching row(s)",
        outcome.points.len(),
        outcome.matched_rows
    );
    Ok(())
}

fn handle_options(config: &DashboardConfig) -> Result<()> {
    let headers = vec!["selection".to_string(), "choices".to_string()];
    let rows = vec![
        vec!["city".to_string(), config.selections.cities.iter().join(", ")],
        vec!["fuel".to_string(), config.selections.fuels.iter().join(", ")],
        vec!["year".to_string(), config.selections.years.iter().join(", ")],
    ];
    print!("{}", table::render_table(&headers, &rows, &[]));
    Ok(())
}

fn handle_preview(config: &DashboardConfig, args: &PreviewArgs) -> Result<()> {
    let source = resolve_source(config, &args.source)?;
    let dataset = Dataset::load(&source, config.columns.clone());
    let columns = dataset.columns();
    let rows = dataset
        .rows()
        .iter()
        .take(args.rows)
        .enumerate()
        .map(|(idx, row)| {
            let record = columns.record(row);
            vec![
                (idx + 1).to_string(),
                record.city.unwrap_or_default().to_string(),
                record.fuel.unwrap_or_default().to_string(),
                record
                    .day
                    .map(|day| day.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                record
                    .price
                    .map(|price| format!("{price:.2}"))
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "city", "fuel", "day", "price"]
        .map(String::from)
        .to_vec();
    print!(
        "{}",
        table::render_table(
            &headers,
            &rows,
            &[Align::Right, Align::Left, Align::Left, Align::Left, Align::Right],
        )
    );
    info!(
        "Displayed {} of {} row(s) from {:?}",
        rows.len(),
        dataset.rows().len(),
        source.path
    );
    Ok(())
}

fn handle_init_config(args: &InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{:?} already exists; pass --force to overwrite it",
            args.output
        );
    }
    DashboardConfig::default()
        .save(&args.output)
        .with_context(|| format!("Writing default config to {:?}", args.output))?;
    info!("Wrote default configuration to {:?}", args.output);
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
