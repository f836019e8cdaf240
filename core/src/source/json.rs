use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::SourceError;
use crate::dataset::RawRow;

pub(super) fn read_rows(path: &Path) -> Result<Vec<RawRow>, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let objects: Vec<Map<String, Value>> =
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(objects.into_iter().map(to_row).collect())
}

/// Scalars become their text form; `null` leaves the column absent.
pub(super) fn to_row(object: Map<String, Value>) -> RawRow {
    let mut row = RawRow::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::String(s) => row.insert(&key, s),
            other => row.insert(&key, other.to_string()),
        }
    }
    row
}
