use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::render::OutputFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "Monthly average fuel retail selling prices", long_about = None)]
pub struct Cli {
    /// Dashboard configuration file (YAML)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chart monthly average RSP for one city, fuel and year
    Chart(ChartArgs),
    /// Re-chart as selection changes arrive on stdin (`city=..`, `fuel=..`, `year=..`)
    Watch(WatchArgs),
    /// List the selectable cities, fuels and years
    Options,
    /// Show how the first rows of the dataset resolve to city, fuel, day and price
    Preview(PreviewArgs),
    /// Write the default configuration to a YAML file
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Dataset file (defaults to the configured dataset; `-` reads stdin, except for `watch`)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the dataset (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Metro city (defaults to the first configured city)
    #[arg(long)]
    pub city: Option<String>,
    /// Fuel product (defaults to the first configured fuel)
    #[arg(long)]
    pub fuel: Option<String>,
    /// Calendar year (defaults to the first configured year)
    #[arg(long)]
    pub year: Option<i32>,
    /// Output rendering
    #[arg(long, value_enum, default_value = "bars")]
    pub format: OutputFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Re-read the dataset on every selection change instead of reusing the first load
    #[arg(long)]
    pub reload: bool,
    /// Output rendering
    #[arg(long, value_enum, default_value = "bars")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Destination YAML file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_symbols() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter("#"), Ok(b'#'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("\u{20b9}").is_err());
    }

    #[test]
    fn chart_arguments_parse() {
        let cli = Cli::try_parse_from([
            "rsp-dashboard",
            "chart",
            "--city",
            "Mumbai",
            "--fuel",
            "Diesel",
            "--year",
            "2022",
            "--format",
            "json",
            "-c",
            "dash.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dash.yaml")));
        match cli.command {
            Commands::Chart(args) => {
                assert_eq!(args.city.as_deref(), Some("Mumbai"));
                assert_eq!(args.year, Some(2022));
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.source.input.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
