//! Error types for dataset file reading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open data file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory map file {path}")]
    MemoryMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported data file {path}: expected a .csv or .json extension")]
    UnsupportedFormat { path: PathBuf },

    #[error("data file {path} has no header row")]
    MissingHeader { path: PathBuf },

    #[error("unterminated quoted field in record {record} of {path}")]
    UnterminatedQuote { path: PathBuf, record: usize },

    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
