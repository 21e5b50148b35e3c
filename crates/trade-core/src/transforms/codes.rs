use std::collections::BTreeMap;

use polars::prelude::*;
use tracing::warn;

use trade_common::column_strings;
use trade_concordance::{CodeConcordance, CompositeCountryCode};
use trade_model::{DataQualityIssue, IssueKind, Operation, TradeSide, columns};

use super::{already_ran, ensure_dependency, log_applied};
use crate::dataset::TradeDataset;
use crate::error::Result;
use crate::frame_utils::require_column;

/// Decodes both composite country codes into region, numeric code and
/// modifier columns. One malformed code aborts the whole operation and
/// leaves the dataset untouched.
pub fn split_country_code(dataset: &mut TradeDataset) -> Result<usize> {
    let operation = Operation::SplitCountryCode;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    let mut df = dataset.data().clone();
    for side in TradeSide::BOTH {
        require_column(&df, &operation.name(), side.code_column())?;
        let codes = column_strings(&df, side.code_column())?;
        let mut regions = Vec::with_capacity(codes.len());
        let mut numerics = Vec::with_capacity(codes.len());
        let mut modifiers = Vec::with_capacity(codes.len());
        for code in &codes {
            let parsed = CompositeCountryCode::parse(code)?;
            regions.push(parsed.region.to_string());
            numerics.push(parsed.numeric.to_string());
            modifiers.push(parsed.modifier.to_string());
        }
        df.with_column(Series::new(side.region_column().into(), regions))?;
        df.with_column(Series::new(side.iso3n_column().into(), numerics))?;
        df.with_column(Series::new(side.modifier_column().into(), modifiers))?;
    }
    let affected = df.height();
    dataset.replace_data(df);
    dataset.record(operation);
    log_applied(operation, affected, affected);
    Ok(affected)
}

/// Adds `iiso3c`/`eiso3c`. Unknown numeric codes become `.` and are
/// reported once per distinct code.
pub fn add_iso3_code(dataset: &mut TradeDataset, concordance: &CodeConcordance) -> Result<usize> {
    let operation = Operation::AddIso3Code;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(
        dataset,
        operation,
        Operation::SplitCountryCode,
        split_country_code,
    )?;
    let affected = add_lookup_columns(
        dataset,
        operation,
        |side| side.iso3c_column(),
        |numeric| concordance.iso3_alpha(numeric),
    )?;
    dataset.record(operation);
    log_applied(operation, affected, dataset.height());
    Ok(affected)
}

/// Adds standardized `icountry`/`ecountry` names.
pub fn add_country_name(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
) -> Result<usize> {
    let operation = Operation::AddCountryName;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(
        dataset,
        operation,
        Operation::SplitCountryCode,
        split_country_code,
    )?;
    let affected = add_lookup_columns(
        dataset,
        operation,
        |side| side.country_column(),
        |numeric| concordance.country_name(numeric),
    )?;
    dataset.record(operation);
    log_applied(operation, affected, dataset.height());
    Ok(affected)
}

/// Maps each side's numeric code through `lookup` into `target(side)`.
/// Returns the number of matched cells.
fn add_lookup_columns<'c>(
    dataset: &mut TradeDataset,
    operation: Operation,
    target: impl Fn(TradeSide) -> &'static str,
    lookup: impl Fn(&str) -> Option<&'c str>,
) -> Result<usize> {
    let mut df = dataset.data().clone();
    let mut matched = 0usize;
    let mut issues = Vec::new();
    for side in TradeSide::BOTH {
        require_column(&df, &operation.name(), side.iso3n_column())?;
        let numerics = column_strings(&df, side.iso3n_column())?;
        let mut unmatched: BTreeMap<String, usize> = BTreeMap::new();
        let mut out = Vec::with_capacity(numerics.len());
        for numeric in &numerics {
            match lookup(numeric) {
                Some(code) => {
                    matched += 1;
                    out.push(code.to_string());
                }
                None => {
                    *unmatched.entry(numeric.clone()).or_insert(0) += 1;
                    out.push(columns::UNMATCHED.to_string());
                }
            }
        }
        for (value, rows) in unmatched {
            warn!(
                operation = %operation,
                column = side.iso3n_column(),
                value = %value,
                rows,
                "unmatched country code"
            );
            issues.push(DataQualityIssue {
                kind: IssueKind::UnmatchedCode,
                column: side.iso3n_column().to_string(),
                value,
                rows,
                operation: operation.name(),
            });
        }
        df.with_column(Series::new(target(side).into(), out))?;
    }
    dataset.replace_data(df);
    dataset.report(issues);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DependencyPolicy;
    use crate::error::TransformError;

    fn dataset(icodes: &[&str], ecodes: &[&str]) -> TradeDataset {
        let n = icodes.len();
        let df = DataFrame::new(vec![
            Series::new("year".into(), vec![1962i32; n]).into_column(),
            Series::new("icode".into(), icodes.to_vec()).into_column(),
            Series::new("ecode".into(), ecodes.to_vec()).into_column(),
            Series::new("sitc".into(), vec!["0011"; n]).into_column(),
            Series::new("value".into(), vec![1.0; n]).into_column(),
        ])
        .unwrap();
        TradeDataset::new(df, [1962])
    }

    fn concordance() -> CodeConcordance {
        CodeConcordance::builder()
            .country("842", "USA", "USA")
            .country("000", "WLD", "World")
            .build()
    }

    #[test]
    fn split_decodes_both_sides() {
        let mut ds = dataset(&["100000"], &["218420"]);
        assert_eq!(split_country_code(&mut ds).unwrap(), 1);
        assert_eq!(column_strings(ds.data(), "eregion").unwrap(), vec!["21"]);
        assert_eq!(column_strings(ds.data(), "eiso3n").unwrap(), vec!["842"]);
        assert_eq!(column_strings(ds.data(), "emod").unwrap(), vec!["0"]);
        assert_eq!(column_strings(ds.data(), "iiso3n").unwrap(), vec!["000"]);
        assert_eq!(split_country_code(&mut ds).unwrap(), 0);
    }

    #[test]
    fn split_aborts_on_malformed_code() {
        let mut ds = dataset(&["100000", "10000"], &["218420", "218420"]);
        let err = split_country_code(&mut ds).unwrap_err();
        assert!(matches!(err, TransformError::MalformedCode(_)));
        assert!(ds.ledger().is_empty());
        assert!(ds.data().column("iregion").is_err());
    }

    #[test]
    fn iso3_marks_unmatched_and_reports() {
        let mut ds = dataset(&["100000", "199990", "199990"], &["218420"; 3]);
        split_country_code(&mut ds).unwrap();
        let matched = add_iso3_code(&mut ds, &concordance()).unwrap();
        assert_eq!(matched, 4);
        assert_eq!(
            column_strings(ds.data(), "iiso3c").unwrap(),
            vec!["WLD", ".", "."]
        );
        assert_eq!(ds.quality().count_of(IssueKind::UnmatchedCode), 1);
        assert_eq!(ds.quality().rows_of(IssueKind::UnmatchedCode), 2);
    }

    #[test]
    fn iso3_requires_split_under_strict_policy() {
        let mut ds = dataset(&["100000"], &["218420"]);
        let err = add_iso3_code(&mut ds, &concordance()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Precondition { ref missing, .. } if missing == "split_country_code"
        ));
    }

    #[test]
    fn iso3_applies_split_under_auto_policy() {
        let mut ds = dataset(&["100000"], &["218420"]).with_policy(DependencyPolicy::AutoApply);
        add_iso3_code(&mut ds, &concordance()).unwrap();
        assert_eq!(
            ds.ledger().entries(),
            &["split_country_code".to_string(), "add_iso3_code".to_string()]
        );
    }

    #[test]
    fn country_names() {
        let mut ds = dataset(&["100000"], &["218420"]);
        split_country_code(&mut ds).unwrap();
        add_country_name(&mut ds, &concordance()).unwrap();
        assert_eq!(column_strings(ds.data(), "ecountry").unwrap(), vec!["USA"]);
        assert_eq!(column_strings(ds.data(), "icountry").unwrap(), vec!["World"]);
    }
}
