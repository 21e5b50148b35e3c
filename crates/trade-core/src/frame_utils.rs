//! Row filtering and whole-table aggregation over polars frames.

use std::collections::BTreeMap;

use polars::prelude::*;

use trade_common::{any_to_string, has_column};
use trade_model::columns;

use crate::error::{Result, TransformError};

const KEY_SEPARATOR: char = '\u{1f}';

pub(crate) fn require_column(df: &DataFrame, operation: &str, column: &str) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(TransformError::MissingColumn {
            operation: operation.to_string(),
            column: column.to_string(),
        })
    }
}

/// Keeps rows whose flag is true. Returns the filtered frame and the number
/// of dropped rows.
pub(crate) fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<(DataFrame, usize)> {
    let dropped = keep.iter().filter(|flag| !**flag).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok((df.filter(&mask)?, dropped))
}

/// Composite row keys over `keys`, one string per row.
pub(crate) fn row_keys(df: &DataFrame, keys: &[&str]) -> PolarsResult<Vec<String>> {
    let key_columns = keys
        .iter()
        .map(|name| df.column(name))
        .collect::<PolarsResult<Vec<_>>>()?;
    let mut out = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut key = String::new();
        for (pos, column) in key_columns.iter().enumerate() {
            if pos > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(&any_to_string(column.get(idx)?));
        }
        out.push(key);
    }
    Ok(out)
}

/// Measure columns present in the frame (`value`, and `quantity` if kept).
pub(crate) fn measure_columns(df: &DataFrame) -> Vec<&'static str> {
    [columns::VALUE, columns::QUANTITY]
        .into_iter()
        .filter(|name| has_column(df, name))
        .collect()
}

/// Every non-measure column, in frame order.
pub(crate) fn key_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| name != columns::VALUE && name != columns::QUANTITY)
        .collect()
}

/// Sums `measures` over groups of identical `keys`.
///
/// Output rows are sorted by the key columns, which keep their dtype.
/// Measures come out as `Float64`; a group whose measure is null on every
/// row keeps a null sum.
pub(crate) fn aggregate_sum(
    df: &DataFrame,
    keys: &[&str],
    measures: &[&str],
) -> PolarsResult<DataFrame> {
    let key_exprs: Vec<Expr> = keys.iter().map(|name| col(*name)).collect();
    let sums: Vec<Expr> = measures
        .iter()
        .map(|name| {
            let measure = col(*name).cast(DataType::Float64);
            when(measure.clone().count().gt(lit(0)))
                .then(measure.sum())
                .otherwise(lit(NULL).cast(DataType::Float64))
                .alias(*name)
        })
        .collect();
    df.clone()
        .lazy()
        .group_by(key_exprs.clone())
        .agg(sums)
        .sort_by_exprs(key_exprs, SortMultipleOptions::default())
        .collect()
}

/// Re-aggregates the frame over every non-measure column.
pub(crate) fn reaggregate(df: &DataFrame) -> PolarsResult<DataFrame> {
    let keys = key_columns(df);
    let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
    let measures = measure_columns(df);
    aggregate_sum(df, &keys, &measures)
}

/// Drops `names` that are present; missing names are ignored.
pub(crate) fn drop_columns(df: &mut DataFrame, names: &[&str]) -> PolarsResult<()> {
    for name in names {
        if has_column(df, name) {
            df.drop_in_place(name)?;
        }
    }
    Ok(())
}

/// Total of `value` per year.
pub(crate) fn value_by_year(df: &DataFrame) -> PolarsResult<BTreeMap<i32, f64>> {
    let years = trade_common::column_i32s(df, columns::YEAR)?;
    let values = trade_common::column_f64s(df, columns::VALUE)?;
    let mut totals = BTreeMap::new();
    for (year, value) in years.into_iter().zip(values) {
        if let (Some(year), Some(value)) = (year, value) {
            *totals.entry(year).or_insert(0.0) += value;
        }
    }
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("year".into(), vec![1962i32, 1962, 1962, 1963]).into_column(),
            Series::new("sitc".into(), vec!["001", "001", "002", "001"]).into_column(),
            Series::new("value".into(), vec![500.0, 300.0, 10.0, 7.0]).into_column(),
            Series::new("quantity".into(), vec![None, Some(2.0), None, None]).into_column(),
        ])
        .unwrap()
    }

    #[test]
    fn aggregates_and_sorts_by_key() {
        let out = aggregate_sum(&frame(), &["year", "sitc"], &["value", "quantity"]).unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(
            trade_common::column_f64s(&out, "value").unwrap(),
            vec![Some(800.0), Some(10.0), Some(7.0)]
        );
        assert_eq!(
            trade_common::column_f64s(&out, "quantity").unwrap(),
            vec![Some(2.0), None, None]
        );
        assert_eq!(out.column("year").unwrap().dtype(), &DataType::Int32);
    }

    #[test]
    fn null_keys_form_their_own_group() {
        let df = DataFrame::new(vec![
            Series::new("dot".into(), vec![None, Some("1"), None]).into_column(),
            Series::new("value".into(), vec![1.0, 2.0, 3.0]).into_column(),
        ])
        .unwrap();
        let out = aggregate_sum(&df, &["dot"], &["value"]).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(out.column("dot").unwrap().null_count(), 1);
        let total: f64 = trade_common::column_f64s(&out, "value")
            .unwrap()
            .into_iter()
            .flatten()
            .sum();
        assert_eq!(total, 6.0);
    }

    #[test]
    fn filter_counts_dropped_rows() {
        let (out, dropped) = filter_rows(&frame(), &[true, false, true, false]).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn yearly_totals() {
        let totals = value_by_year(&frame()).unwrap();
        assert_eq!(totals.get(&1962), Some(&810.0));
        assert_eq!(totals.get(&1963), Some(&7.0));
    }
}
