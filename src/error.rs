use std::path::PathBuf;

use thiserror::Error;

/// Failures while fetching or decoding the source document.
///
/// These never escape the pipeline: [`crate::rows::load_rows`] logs them and
/// degrades to an empty dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Reading dataset {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset {path:?} is not valid {encoding} text")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },
    #[error("Parsing delimited text from {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
