//! Parsers for the static reference tables.

pub mod countries;
pub mod recodes;
pub mod sitc;

use std::path::Path;

use crate::error::ConcordanceError;

/// A reference table read fully into memory: trimmed headers plus records.
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<csv::StringRecord>,
}

impl RawTable {
    /// Position of `name` in the header row, or a `MalformedTable` error.
    pub fn require_column(&self, table: &str, name: &str) -> Result<usize, ConcordanceError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ConcordanceError::malformed(table, format!("missing column '{name}'")))
    }
}

pub(crate) fn read_table(path: &Path) -> Result<RawTable, ConcordanceError> {
    let bytes = std::fs::read(path).map_err(|e| ConcordanceError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| ConcordanceError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ConcordanceError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        records.push(row);
    }
    Ok(RawTable { headers, records })
}

/// Trimmed field value; empty when the row is short.
pub(crate) fn field(row: &csv::StringRecord, idx: usize) -> &str {
    row.get(idx).map(str::trim).unwrap_or("")
}
