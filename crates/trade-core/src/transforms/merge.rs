use std::collections::BTreeMap;

use polars::prelude::*;

use trade_common::{column_f64s, column_strings, has_column};
use trade_model::{Operation, columns};

use super::{already_ran, log_applied};
use crate::dataset::TradeDataset;
use crate::error::{Result, TransformError};
use crate::frame_utils::{require_column, row_keys};

/// Merges a correction table into untransformed data.
///
/// Rows are matched on `(year, icode, ecode, sitc, unit, dot)`:
/// - key in both: the adjustment's `value` wins,
/// - key only in the adjustment: the row is appended,
/// - key only in the original: the row passes through unchanged.
///
/// `quantity` is merged the same way when the adjustment table has it; a
/// null adjustment quantity leaves the original quantity alone. Original row
/// order is kept and inserted rows follow in adjustment-table order.
pub fn merge_adjustment_data(dataset: &mut TradeDataset, adjustment: &DataFrame) -> Result<usize> {
    let operation = Operation::MergeAdjustmentData;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    if !dataset.ledger().is_empty() {
        return Err(TransformError::NotPristine {
            operation: operation.name(),
            ledger: dataset.ledger().to_string(),
        });
    }
    let df = dataset.data();
    let name = operation.name();
    for column in columns::ADJUSTMENT_KEY.iter().chain([&columns::VALUE]) {
        require_column(df, &name, column)?;
        require_column(adjustment, &name, column)?;
    }

    let adjustment_keys = row_keys(adjustment, &columns::ADJUSTMENT_KEY)?;
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for (row, key) in adjustment_keys.iter().enumerate() {
        if index.insert(key.as_str(), row).is_some() {
            return Err(TransformError::DuplicateAdjustmentKey {
                key: key.replace('\u{1f}', "/"),
            });
        }
    }

    let adjustment_values = column_f64s(adjustment, columns::VALUE)?;
    let adjustment_quantities = if has_column(adjustment, columns::QUANTITY) {
        Some(column_f64s(adjustment, columns::QUANTITY)?)
    } else {
        None
    };
    let mut values = column_f64s(df, columns::VALUE)?;
    let mut quantities = if has_column(df, columns::QUANTITY) {
        Some(column_f64s(df, columns::QUANTITY)?)
    } else {
        None
    };

    let mut matched = vec![false; adjustment.height()];
    let mut replaced = 0usize;
    for (row, key) in row_keys(df, &columns::ADJUSTMENT_KEY)?.iter().enumerate() {
        let Some(&source) = index.get(key.as_str()) else {
            continue;
        };
        matched[source] = true;
        replaced += 1;
        values[row] = adjustment_values[source];
        if let (Some(quantities), Some(adjusted)) =
            (quantities.as_mut(), adjustment_quantities.as_ref())
            && adjusted[source].is_some()
        {
            quantities[row] = adjusted[source];
        }
    }

    let mut merged = df.clone();
    merged.with_column(Series::new(columns::VALUE.into(), values))?;
    if let Some(quantities) = quantities {
        merged.with_column(Series::new(columns::QUANTITY.into(), quantities))?;
    }

    let unmatched: Vec<bool> = matched.iter().map(|m| !*m).collect();
    let inserted_count = unmatched.iter().filter(|m| **m).count();
    if inserted_count > 0 {
        let mask = BooleanChunked::from_slice("insert".into(), &unmatched);
        let inserted = conform_inserted(df, &adjustment.filter(&mask)?)?;
        merged.vstack_mut(&inserted)?;
    }

    dataset.replace_data(merged);
    dataset.record(operation);
    log_applied(operation, replaced + inserted_count, dataset.height());
    Ok(replaced + inserted_count)
}

/// Shapes adjustment-only rows like the original frame: same columns, same
/// order, same dtypes. Reported names are borrowed from original rows with
/// the same code; anything else the adjustment lacks is null.
fn conform_inserted(original: &DataFrame, rows: &DataFrame) -> Result<DataFrame> {
    let names = [
        (columns::IMPORTER_NAME, columns::IMPORTER_CODE),
        (columns::EXPORTER_NAME, columns::EXPORTER_CODE),
    ];
    let mut out = Vec::with_capacity(original.width());
    for column in original.get_columns() {
        let name = column.name().as_str();
        let dtype = column.dtype();
        let conformed = if let Ok(source) = rows.column(name) {
            source.cast(dtype)?
        } else if let Some((_, code_column)) = names.iter().find(|(n, _)| *n == name) {
            let lookup = first_name_by_code(original, code_column, name)?;
            let filled: Vec<String> = column_strings(rows, code_column)?
                .iter()
                .map(|code| lookup.get(code).cloned().unwrap_or_default())
                .collect();
            Series::new(name.into(), filled).into_column().cast(dtype)?
        } else {
            Column::full_null(name.into(), rows.height(), dtype)
        };
        out.push(conformed);
    }
    Ok(DataFrame::new(out)?)
}

fn first_name_by_code(
    df: &DataFrame,
    code_column: &str,
    name_column: &str,
) -> Result<BTreeMap<String, String>> {
    let mut lookup = BTreeMap::new();
    if has_column(df, code_column) && has_column(df, name_column) {
        let codes = column_strings(df, code_column)?;
        let names = column_strings(df, name_column)?;
        for (code, name) in codes.into_iter().zip(names) {
            lookup.entry(code).or_insert(name);
        }
    }
    Ok(lookup)
}
