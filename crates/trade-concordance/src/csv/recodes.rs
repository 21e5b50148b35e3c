#![deny(unsafe_code)]

use std::path::Path;

use super::countries::is_alpha_code;
use super::{field, read_table};
use crate::error::ConcordanceError;

const TABLE: &str = "intertemporal_countries";

/// Marker in the recode column for countries that have no consistent
/// intertemporal identity and are dropped.
pub const DROP_MARKER: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RecodeRecord {
    pub alpha_code: String,
    /// Target alpha code, or [`DROP_MARKER`].
    pub recode: String,
}

pub fn parse_recodes_csv(path: &Path) -> Result<Vec<RecodeRecord>, ConcordanceError> {
    let table = read_table(path)?;
    let alpha_idx = table.require_column(TABLE, "alpha_code")?;
    let recode_idx = table.require_column(TABLE, "recode")?;

    let mut results: Vec<RecodeRecord> = Vec::with_capacity(table.records.len());
    for (line, row) in table.records.iter().enumerate() {
        let alpha_code = field(row, alpha_idx).to_string();
        let recode = field(row, recode_idx).to_string();
        if !is_alpha_code(&alpha_code) || !(is_alpha_code(&recode) || recode == DROP_MARKER) {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("row {}: invalid recode '{alpha_code}' -> '{recode}'", line + 2),
            ));
        }
        if results.iter().any(|r| r.alpha_code == alpha_code) {
            return Err(ConcordanceError::malformed(
                TABLE,
                format!("duplicate alpha code '{alpha_code}'"),
            ));
        }
        results.push(RecodeRecord { alpha_code, recode });
    }
    Ok(results)
}
