#![deny(unsafe_code)]

use std::path::Path;

use super::{field, read_table};
use crate::error::ConcordanceError;

const TABLE: &str = "sitc_r2";

/// One official SITC revision 2 classification code.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SitcCodeRecord {
    pub code: String,
    pub level: u8,
    pub parent_code: Option<String>,
}

pub fn parse_sitc_csv(path: &Path) -> Result<Vec<SitcCodeRecord>, ConcordanceError> {
    let table = read_table(path)?;
    let code_idx = table.require_column(TABLE, "classification_code")?;
    let level_idx = table.require_column(TABLE, "level")?;
    let parent_idx = table.require_column(TABLE, "parent_code")?;

    let mut results = Vec::with_capacity(table.records.len());
    for (line, row) in table.records.iter().enumerate() {
        let code = field(row, code_idx).to_string();
        let level: u8 = field(row, level_idx).parse().map_err(|_| {
            ConcordanceError::malformed(
                TABLE,
                format!("row {}: invalid level '{}'", line + 2, field(row, level_idx)),
            )
        })?;
        if !(1..=4).contains(&level)
            || code.len() != usize::from(level)
            || !code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: code '{code}' does not match level {level}", line + 2),
            ));
        }
        let parent = field(row, parent_idx);
        let parent_code = if parent.is_empty() {
            None
        } else {
            Some(parent.to_string())
        };
        let expected_parent = (level > 1).then(|| &code[..code.len() - 1]);
        if parent_code.as_deref() != expected_parent {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: parent of '{code}' must be its prefix", line + 2),
            ));
        }
        results.push(SitcCodeRecord {
            code,
            level,
            parent_code,
        });
    }
    results.sort_by(|a, b| a.code.cmp(&b.code));
    results.dedup_by(|a, b| a.code == b.code);
    Ok(results)
}
