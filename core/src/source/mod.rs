//! Dataset file readers.
//!
//! Turns a CSV or JSON file into [`RawRow`]s; everything past that
//! (coercion, defaults, dropping) belongs to the event store.

mod csv;
mod error;
mod json;

#[cfg(test)]
mod tests;

use std::path::Path;

pub use error::SourceError;

use crate::dataset::RawRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Detect from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("json") => Ok(SourceFormat::Json),
            _ => Err(SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read every row of a dataset file, in file order.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let rows = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => csv::read_rows(path)?,
        SourceFormat::Json => json::read_rows(path)?,
    };
    tracing::info!(path = %path.display(), rows = rows.len(), "Dataset file read");
    Ok(rows)
}
