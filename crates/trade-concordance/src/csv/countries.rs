#![deny(unsafe_code)]

use std::path::Path;

use super::{field, read_table};
use crate::error::ConcordanceError;

const TABLE: &str = "countries";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CountryRecord {
    /// Three-digit numeric code, zero padded.
    pub numeric_code: String,
    pub alpha_code: String,
    pub display_name: String,
}

/// Left-pads a numeric country code to three digits (`4` -> `004`).
pub fn normalize_numeric(code: &str) -> String {
    let code = code.trim();
    if !code.is_empty() && code.len() < 3 && code.bytes().all(|b| b.is_ascii_digit()) {
        format!("{code:0>3}")
    } else {
        code.to_string()
    }
}

pub fn is_alpha_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

pub fn parse_countries_csv(path: &Path) -> Result<Vec<CountryRecord>, ConcordanceError> {
    let table = read_table(path)?;
    let numeric_idx = table.require_column(TABLE, "numeric_code")?;
    let alpha_idx = table.require_column(TABLE, "alpha_code")?;
    let name_idx = table.require_column(TABLE, "display_name")?;

    let mut results = Vec::with_capacity(table.records.len());
    for (line, row) in table.records.iter().enumerate() {
        let numeric_code = normalize_numeric(field(row, numeric_idx));
        if numeric_code.len() != 3 || !numeric_code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: invalid numeric code '{numeric_code}'", line + 2),
            ));
        }
        let alpha_code = field(row, alpha_idx).to_string();
        if !is_alpha_code(&alpha_code) {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: invalid alpha code '{alpha_code}'", line + 2),
            ));
        }
        let display_name = field(row, name_idx).to_string();
        if display_name.is_empty() {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: empty display name", line + 2),
            ));
        }
        results.push(CountryRecord {
            numeric_code,
            alpha_code,
            display_name,
        });
    }

    results.sort_by(|a, b| a.numeric_code.cmp(&b.numeric_code));
    if let Some(pair) = results
        .windows(2)
        .find(|pair| pair[0].numeric_code == pair[1].numeric_code)
    {
        return Err(ConcordanceError::malformed(
            TABLE,
            format!("duplicate numeric code '{}'", pair[0].numeric_code),
        ));
    }
    Ok(results)
}
