//! Record parsing: delimited text into [`RawRow`] records.
//!
//! [`parse_document()`] treats the first line as the authoritative header and
//! produces one [`RawRow`] per non-blank data line. [`load_rows()`] wraps the
//! fetch, decode and parse steps and degrades any failure to an empty dataset.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Arc,
};

use encoding_rs::Encoding;
use log::{debug, error};

use crate::{error::LoadError, io_utils};

/// Column names of a document, shared by every row parsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Headers {
    pub fn new(names: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        // A repeated header name resolves to its last occurrence.
        for (idx, name) in names.iter().enumerate() {
            positions.insert(name.clone(), idx);
        }
        Self { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data line keyed by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    headers: Arc<Headers>,
    values: Vec<String>,
}

impl RawRow {
    /// Pads missing trailing fields with empty strings and drops extras.
    pub fn new(headers: Arc<Headers>, mut values: Vec<String>) -> Self {
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .position(column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Where the dataset is fetched from and how to decode it.
#[derive(Debug, Clone)]
pub struct DataSource {
    pub path: PathBuf,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: Option<u8>, encoding: &'static Encoding) -> Self {
        let path = path.into();
        let delimiter = io_utils::resolve_input_delimiter(&path, delimiter);
        Self {
            path,
            delimiter,
            encoding,
        }
    }

    pub fn fetch(&self) -> Result<Vec<RawRow>, LoadError> {
        let bytes = io_utils::read_source_bytes(&self.path)?;
        let text = io_utils::decode_text(&self.path, &bytes, self.encoding)?;
        parse_document(&text, self.delimiter).map_err(|source| LoadError::Csv {
            path: self.path.clone(),
            source,
        })
    }
}

pub fn parse_document(text: &str, delimiter: u8) -> Result<Vec<RawRow>, csv::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
    let names = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let headers = Arc::new(Headers::new(names));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let values = record.iter().map(str::to_string).collect();
        rows.push(RawRow::new(Arc::clone(&headers), values));
    }
    Ok(rows)
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Fetches and parses `source`, logging any failure and returning no rows
/// instead of an error.
pub fn load_rows(source: &DataSource) -> Vec<RawRow> {
    match source.fetch() {
        Ok(rows) => {
            debug!("Loaded {} row(s) from {:?}", rows.len(), source.path);
            for row in rows.iter().take(3) {
                debug!("Raw data sample: {:?}", row.iter().collect::<Vec<_>>());
            }
            rows
        }
        Err(err) => {
            error!("{:#}", anyhow::Error::from(err));
            Vec::new()
        }
    }
}
