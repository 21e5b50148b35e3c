use tracing::debug;

use polars::prelude::*;

use trade_common::column_strings;
use trade_model::{Operation, ProductLevel, columns};

use super::{already_ran, log_applied};
use crate::dataset::TradeDataset;
use crate::error::{Result, TransformError};
use crate::frame_utils::{drop_columns, reaggregate, require_column};

/// Drops `unit` and `quantity`, then sums `value` over rows that became
/// duplicates. Returns the number of rows merged away.
pub fn collapse_to_values_only(dataset: &mut TradeDataset) -> Result<usize> {
    let operation = Operation::CollapseToValuesOnly;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    require_column(dataset.data(), &operation.name(), columns::VALUE)?;
    let before = dataset.height();
    let mut df = dataset.data().clone();
    drop_columns(&mut df, &[columns::UNIT, columns::QUANTITY])?;
    let collapsed = reaggregate(&df)?;
    let merged = before - collapsed.height();
    dataset.replace_data(collapsed);
    dataset.record(operation);
    log_applied(operation, merged, dataset.height());
    Ok(merged)
}

/// Truncates product codes to `digits` and re-aggregates.
///
/// `digits` must be 1 to 3 and below the current level. An existing
/// `official` flag describes the longer codes: it is dropped and
/// `mark_official_codes` leaves the ledger so it can flag the new codes.
pub fn collapse_to_product_level(dataset: &mut TradeDataset, digits: u8) -> Result<usize> {
    let current = dataset.level();
    let invalid = || TransformError::InvalidLevel {
        requested: digits,
        current: current.digits(),
    };
    let level = ProductLevel::new(digits)
        .ok()
        .filter(|level| *level < ProductLevel::RAW)
        .ok_or_else(invalid)?;
    let operation = Operation::CollapseToProductLevel(level);
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    if level >= current {
        return Err(invalid());
    }
    require_column(dataset.data(), &operation.name(), columns::PRODUCT_CODE)?;

    let before = dataset.height();
    let mut df = dataset.data().clone();
    let truncated: Vec<String> = column_strings(&df, columns::PRODUCT_CODE)?
        .iter()
        .map(|code| code.chars().take(usize::from(digits)).collect())
        .collect();
    df.with_column(Series::new(columns::PRODUCT_CODE.into(), truncated))?;
    let stale_official = df.column(columns::OFFICIAL).is_ok();
    if stale_official {
        debug!(operation = %operation, "dropping stale official flag");
        drop_columns(&mut df, &[columns::OFFICIAL])?;
    }
    let collapsed = reaggregate(&df)?;
    let merged = before - collapsed.height();
    dataset.replace_data(collapsed);
    dataset.set_level(level);
    if stale_official {
        dataset.forget(Operation::MarkOfficialCodes);
    }
    dataset.record(operation);
    log_applied(operation, merged, dataset.height());
    Ok(merged)
}
