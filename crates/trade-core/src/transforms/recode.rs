use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::{info, warn};

use trade_common::column_strings;
use trade_concordance::CodeConcordance;
use trade_model::{DataQualityIssue, IssueKind, Operation, TradeSide};

use super::{already_ran, countries_only, log_applied};
use crate::dataset::{DependencyPolicy, TradeDataset};
use crate::error::{Result, TransformError};
use crate::frame_utils::{drop_columns, filter_rows, reaggregate, require_column};

/// Sides whose alpha codes hold real countries, judged from the ledger.
fn country_sides(dataset: &TradeDataset) -> Vec<TradeSide> {
    if dataset.ledger().has_run(Operation::CountriesOnly) {
        return TradeSide::BOTH.to_vec();
    }
    TradeSide::BOTH
        .into_iter()
        .filter(|side| dataset.ledger().has_run(Operation::CountrySideOnly(*side)))
        .collect()
}

/// Replaces alpha codes with their intertemporally consistent recode, so a
/// country keeps one identity across 1962-2000 (e.g. `DDR` becomes `DEU`).
///
/// Rows whose country has no recode, or is marked for dropping, are removed.
/// The reported identity columns of recoded sides no longer apply and are
/// dropped before the table is re-aggregated. Requires the full source year
/// range unless `force` is set.
pub fn recode_intertemporal_country(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
    force: bool,
) -> Result<usize> {
    let operation = Operation::RecodeIntertemporalCountry;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    let mut sides = country_sides(dataset);
    if sides.is_empty() {
        match dataset.policy() {
            DependencyPolicy::Strict => {
                return Err(TransformError::Precondition {
                    operation: operation.name(),
                    missing: "countries_only or country_side_only".to_string(),
                });
            }
            DependencyPolicy::AutoApply => {
                info!(operation = %operation, dependency = "countries_only", "applying missing dependency");
                countries_only(dataset, concordance)?;
                sides = TradeSide::BOTH.to_vec();
            }
        }
    }
    dataset.ensure_complete(operation, force)?;

    let mut df = dataset.data().clone();
    let mut keep = vec![true; df.height()];
    let mut changed = 0usize;
    let mut issues = Vec::new();
    for side in &sides {
        let column = side.iso3c_column();
        require_column(&df, &operation.name(), column)?;
        let codes = column_strings(&df, column)?;
        let mut unrecoded: BTreeMap<&str, usize> = BTreeMap::new();
        let mut recoded = Vec::with_capacity(codes.len());
        for (row, code) in codes.iter().enumerate() {
            match concordance.recode(code) {
                Some(target) => {
                    if target != code {
                        changed += 1;
                    }
                    recoded.push(target.to_string());
                }
                None => {
                    keep[row] = false;
                    *unrecoded.entry(code.as_str()).or_insert(0) += 1;
                    recoded.push(code.clone());
                }
            }
        }
        for (value, rows) in unrecoded {
            warn!(operation = %operation, column, value, rows, "country has no intertemporal recode");
            issues.push(DataQualityIssue {
                kind: IssueKind::UnrecodedCountry,
                column: column.to_string(),
                value: value.to_string(),
                rows,
                operation: operation.name(),
            });
        }
        df.with_column(Series::new(column.into(), recoded))?;
    }

    let (mut filtered, dropped) = filter_rows(&df, &keep)?;
    for side in &sides {
        drop_columns(&mut filtered, &side.identity_columns())?;
    }
    let aggregated = reaggregate(&filtered)?;
    dataset.replace_data(aggregated);
    dataset.report(issues);
    dataset.record(operation);
    log_applied(operation, changed + dropped, dataset.height());
    Ok(changed + dropped)
}
