use hashbrown::HashMap;

use super::columns::canonical_name;

/// One parsed input row: column name to raw string value.
///
/// Column names are canonicalized on insert, so `sideA` and `side_a` land
/// on the same key. Values are kept verbatim; coercion happens during
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.fields
            .insert(canonical_name(column).to_string(), value.into());
    }

    /// Trimmed value, or None if the column is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k.as_ref(), v);
        }
        row
    }
}
