//! Dashboard configuration: dataset location, column aliases, and the
//! selectable cities, fuels and years.
//!
//! Stored as YAML. Every key is optional; anything omitted falls back to the
//! defaults that match the published RSP dataset.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, anyhow, ensure};
use serde::{Deserialize, Serialize};

use crate::{cli::parse_delimiter, columns::ColumnAliases, filter::FilterCriteria, io_utils};

pub const DEFAULT_DATASET: &str = "rspData.csv";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    pub columns: ColumnAliases,
    pub selections: Selections,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Selections {
    pub cities: Vec<String>,
    pub fuels: Vec<String>,
    pub years: Vec<i32>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET),
            delimiter: None,
            encoding: None,
            columns: ColumnAliases::default(),
            selections: Selections::default(),
        }
    }
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            cities: ["Delhi", "Mumbai", "Kolkata", "Chennai"]
                .map(String::from)
                .to_vec(),
            fuels: ["Petrol", "Diesel"].map(String::from).to_vec(),
            years: (2017..=2025).collect(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        config
            .validate()
            .with_context(|| format!("Validating config file {path:?}"))?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_yaml::to_string(self).context("Serializing config")?;
        fs::write(path, serialized).with_context(|| format!("Writing config file {path:?}"))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, aliases) in [
            ("city", &self.columns.city),
            ("fuel", &self.columns.fuel),
            ("day", &self.columns.day),
            ("price", &self.columns.price),
        ] {
            ensure!(
                !aliases.is_empty(),
                "Column aliases for '{name}' must not be empty"
            );
        }
        ensure!(
            !self.selections.cities.is_empty(),
            "At least one city must be selectable"
        );
        ensure!(
            !self.selections.fuels.is_empty(),
            "At least one fuel must be selectable"
        );
        ensure!(
            !self.selections.years.is_empty(),
            "At least one year must be selectable"
        );
        self.delimiter_byte()?;
        io_utils::resolve_encoding(self.encoding.as_deref())?;
        Ok(())
    }

    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        self.delimiter
            .as_deref()
            .map(|value| parse_delimiter(value).map_err(|err| anyhow!(err)))
            .transpose()
    }

    /// First city, first fuel and first year.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.selections.cities.first().cloned().unwrap_or_default(),
            self.selections.fuels.first().cloned().unwrap_or_default(),
            self.selections.years.first().copied().unwrap_or_default(),
        )
    }

    /// Resolves a city against the selectable list, ignoring case and
    /// surrounding whitespace, and returns the canonical spelling.
    pub fn resolve_city(&self, value: &str) -> Result<String> {
        resolve_choice("city", &self.selections.cities, value)
    }

    pub fn resolve_fuel(&self, value: &str) -> Result<String> {
        resolve_choice("fuel", &self.selections.fuels, value)
    }

    pub fn resolve_year(&self, value: i32) -> Result<i32> {
        if self.selections.years.contains(&value) {
            Ok(value)
        } else {
            Err(anyhow!(
                "Year {value} is not selectable (expected one of {})",
                join_display(&self.selections.years)
            ))
        }
    }

    pub fn resolve_criteria(&self, city: &str, fuel: &str, year: i32) -> Result<FilterCriteria> {
        Ok(FilterCriteria::new(
            self.resolve_city(city)?,
            self.resolve_fuel(fuel)?,
            self.resolve_year(year)?,
        ))
    }
}

fn resolve_choice(kind: &str, choices: &[String], value: &str) -> Result<String> {
    let wanted = value.trim();
    choices
        .iter()
        .find(|choice| choice.trim().eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Unknown {kind} '{wanted}' (expected one of {})",
                join_display(choices)
            )
        })
}

fn join_display<T: std::fmt::Display>(values: &[T]) -> String {
    itertools::join(values, ", ")
}
