use std::path::PathBuf;

use serde::Serialize;
use trade_core::CoverageReport;
use trade_model::DataType;

/// Outcome of one recipe for one data type.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub recipe: String,
    pub data_type: DataType,
    pub rows: usize,
    /// `None` on a dry run.
    pub output: Option<PathBuf>,
    pub coverage: CoverageReport,
    /// Data quality issues reported while building.
    pub issues: usize,
    pub ledger: Vec<String>,
}

impl RecipeSummary {
    /// Mean of the yearly coverage percentages that could be computed.
    pub fn mean_coverage(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .coverage
            .years
            .iter()
            .filter_map(|year| year.coverage_pct)
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub output_dir: Option<PathBuf>,
    pub years: Vec<i32>,
    pub source_rows: usize,
    /// Rows replaced or inserted by the adjustment merge.
    pub adjusted_rows: Option<usize>,
    pub recipes: Vec<RecipeSummary>,
}
