//! Typed reading of trade flow CSV files.
//!
//! Headers are matched case-insensitively after trimming, and the source
//! product column `sitc4` is accepted as `sitc`.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use polars::prelude::*;

use trade_common::parse_f64;
use trade_model::columns;

use crate::error::LoadError;

fn normalize_header(raw: &str) -> String {
    let header = raw.trim().trim_matches('\u{feff}').to_ascii_lowercase();
    if header == columns::SOURCE_PRODUCT_CODE {
        columns::PRODUCT_CODE.to_string()
    } else {
        header
    }
}

/// A CSV file held as records plus header positions.
pub(crate) struct TypedCsv {
    path: PathBuf,
    headers: Vec<String>,
    records: Vec<StringRecord>,
}

impl TypedCsv {
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| LoadError::io(path, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| LoadError::Csv {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .iter()
            .map(normalize_header)
            .collect();
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| LoadError::Csv {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            records.push(record);
        }
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            records,
        })
    }

    pub fn height(&self) -> usize {
        self.records.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.position(name).ok_or_else(|| LoadError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }

    fn cell(record: &StringRecord, idx: usize) -> &str {
        record.get(idx).map(str::trim).unwrap_or("")
    }

    fn line(record: &StringRecord) -> u64 {
        record.position().map_or(0, csv::Position::line)
    }

    fn invalid(&self, record: &StringRecord, column: &str, value: &str) -> LoadError {
        LoadError::InvalidValue {
            path: self.path.clone(),
            line: Self::line(record),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn years(&self, name: &str) -> Result<Vec<i32>, LoadError> {
        let idx = self.require(name)?;
        self.records
            .iter()
            .map(|record| {
                let raw = Self::cell(record, idx);
                // Some extracts store the year as a float ("1962.0").
                parse_f64(raw)
                    .filter(|v| v.fract() == 0.0)
                    .map(|v| v as i32)
                    .ok_or_else(|| self.invalid(record, name, raw))
            })
            .collect()
    }

    pub fn strings(&self, name: &str) -> Result<Vec<String>, LoadError> {
        let idx = self.require(name)?;
        Ok(self
            .records
            .iter()
            .map(|record| Self::cell(record, idx).to_string())
            .collect())
    }

    /// Empty cells become nulls; a missing column is all nulls.
    pub fn optional_strings(&self, name: &str) -> Vec<Option<String>> {
        let Some(idx) = self.position(name) else {
            return vec![None; self.height()];
        };
        self.records
            .iter()
            .map(|record| {
                let value = Self::cell(record, idx);
                (!value.is_empty()).then(|| value.to_string())
            })
            .collect()
    }

    pub fn numbers(&self, name: &str) -> Result<Vec<f64>, LoadError> {
        let idx = self.require(name)?;
        self.records
            .iter()
            .map(|record| {
                let raw = Self::cell(record, idx);
                parse_f64(raw).ok_or_else(|| self.invalid(record, name, raw))
            })
            .collect()
    }

    /// Empty cells become nulls; non-numeric text is an error.
    pub fn optional_numbers(&self, name: &str) -> Result<Vec<Option<f64>>, LoadError> {
        let Some(idx) = self.position(name) else {
            return Ok(vec![None; self.height()]);
        };
        self.records
            .iter()
            .map(|record| {
                let raw = Self::cell(record, idx);
                if raw.is_empty() {
                    Ok(None)
                } else {
                    parse_f64(raw)
                        .map(Some)
                        .ok_or_else(|| self.invalid(record, name, raw))
                }
            })
            .collect()
    }
}

/// Builds the raw interface frame (`year` through `quantity`).
pub(crate) fn raw_frame(table: &TypedCsv) -> Result<DataFrame, LoadError> {
    let frame = DataFrame::new(vec![
        Series::new(columns::YEAR.into(), table.years(columns::YEAR)?).into_column(),
        Series::new(
            columns::IMPORTER_CODE.into(),
            table.strings(columns::IMPORTER_CODE)?,
        )
        .into_column(),
        Series::new(
            columns::IMPORTER_NAME.into(),
            table.strings(columns::IMPORTER_NAME)?,
        )
        .into_column(),
        Series::new(
            columns::EXPORTER_CODE.into(),
            table.strings(columns::EXPORTER_CODE)?,
        )
        .into_column(),
        Series::new(
            columns::EXPORTER_NAME.into(),
            table.strings(columns::EXPORTER_NAME)?,
        )
        .into_column(),
        Series::new(
            columns::PRODUCT_CODE.into(),
            table.strings(columns::PRODUCT_CODE)?,
        )
        .into_column(),
        Series::new(columns::UNIT.into(), table.optional_strings(columns::UNIT)).into_column(),
        Series::new(
            columns::DIRECTION.into(),
            table.optional_strings(columns::DIRECTION),
        )
        .into_column(),
        Series::new(columns::VALUE.into(), table.numbers(columns::VALUE)?).into_column(),
        Series::new(
            columns::QUANTITY.into(),
            table.optional_numbers(columns::QUANTITY)?,
        )
        .into_column(),
    ])?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header(" SITC4 "), "sitc");
        assert_eq!(normalize_header("\u{feff}year"), "year");
        assert_eq!(normalize_header("Value"), "value");
    }
}
