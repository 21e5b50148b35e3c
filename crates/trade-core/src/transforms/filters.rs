use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use trade_common::{column_bools, column_i32s, column_strings};
use trade_concordance::CodeConcordance;
use trade_model::{Operation, TradeSide, columns};

use super::{
    add_iso3_code, already_ran, ensure_dependency, log_applied, mark_official_codes,
};
use crate::dataset::TradeDataset;
use crate::error::Result;
use crate::frame_utils::{filter_rows, require_column};

fn is_country(code: &str) -> bool {
    code != columns::UNMATCHED && code != columns::WORLD
}

/// Applies a row predicate over both alpha code columns.
fn filter_by_iso3(
    dataset: &mut TradeDataset,
    operation: Operation,
    keep: impl Fn(&str, &str) -> bool,
) -> Result<usize> {
    let df = dataset.data();
    require_column(df, &operation.name(), columns::EXPORTER_ISO3C)?;
    require_column(df, &operation.name(), columns::IMPORTER_ISO3C)?;
    let exporters = column_strings(df, columns::EXPORTER_ISO3C)?;
    let importers = column_strings(df, columns::IMPORTER_ISO3C)?;
    let mask: Vec<bool> = exporters
        .iter()
        .zip(&importers)
        .map(|(e, i)| keep(e, i))
        .collect();
    let (filtered, dropped) = filter_rows(df, &mask)?;
    dataset.replace_data(filtered);
    dataset.record(operation);
    log_applied(operation, dropped, dataset.height());
    Ok(dropped)
}

/// Keeps bilateral flows between real countries: drops every row where
/// either side is unmatched or the world aggregate.
pub fn countries_only(dataset: &mut TradeDataset, concordance: &CodeConcordance) -> Result<usize> {
    let operation = Operation::CountriesOnly;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(dataset, operation, Operation::AddIso3Code, |ds| {
        add_iso3_code(ds, concordance)
    })?;
    filter_by_iso3(dataset, operation, |e, i| is_country(e) && is_country(i))
}

/// Keeps world aggregate rows: either side is `WLD` and neither is unmatched.
pub fn world_only(dataset: &mut TradeDataset, concordance: &CodeConcordance) -> Result<usize> {
    let operation = Operation::WorldOnly;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(dataset, operation, Operation::AddIso3Code, |ds| {
        add_iso3_code(ds, concordance)
    })?;
    filter_by_iso3(dataset, operation, |e, i| {
        (e == columns::WORLD || i == columns::WORLD)
            && e != columns::UNMATCHED
            && i != columns::UNMATCHED
    })
}

/// Keeps rows whose `side` is a real country and whose partner is not the
/// world aggregate. Unmatched partners survive so that one-sided totals
/// still count trade with unidentified partners.
pub fn country_side_only(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
    side: TradeSide,
) -> Result<usize> {
    let operation = Operation::CountrySideOnly(side);
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(dataset, operation, Operation::AddIso3Code, |ds| {
        add_iso3_code(ds, concordance)
    })?;
    filter_by_iso3(dataset, operation, |e, i| {
        let (own, partner) = match side {
            TradeSide::Exporter => (e, i),
            TradeSide::Importer => (i, e),
        };
        is_country(own) && partner != columns::WORLD
    })
}

/// Drops product codes carrying a letter marker (`A`, `X` and the like, in
/// either case) used for flows that could not be classified to a full code.
pub fn drop_alpha_codes(dataset: &mut TradeDataset) -> Result<usize> {
    let operation = Operation::DropAlphaCodes;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    let df = dataset.data();
    require_column(df, &operation.name(), columns::PRODUCT_CODE)?;
    let mask: Vec<bool> = column_strings(df, columns::PRODUCT_CODE)?
        .iter()
        .map(|code| !code.chars().any(|c| c.is_ascii_alphabetic()))
        .collect();
    let (filtered, dropped) = filter_rows(df, &mask)?;
    dataset.replace_data(filtered);
    dataset.record(operation);
    log_applied(operation, dropped, dataset.height());
    Ok(dropped)
}

/// Drops rows flagged as non-official by [`mark_official_codes`].
pub fn drop_non_official_codes(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
) -> Result<usize> {
    let operation = Operation::DropNonOfficialCodes;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(dataset, operation, Operation::MarkOfficialCodes, |ds| {
        mark_official_codes(ds, concordance)
    })?;
    let df = dataset.data();
    require_column(df, &operation.name(), columns::OFFICIAL)?;
    let mask: Vec<bool> = column_bools(df, columns::OFFICIAL)?
        .into_iter()
        .map(|flag| flag.unwrap_or(false))
        .collect();
    let (filtered, dropped) = filter_rows(df, &mask)?;
    dataset.replace_data(filtered);
    dataset.record(operation);
    log_applied(operation, dropped, dataset.height());
    Ok(dropped)
}

/// Drops rows whose exporter or importer is missing from at least one
/// loaded year, leaving a balanced country panel.
///
/// Presence is judged across every alpha code column still in the frame,
/// so after aggregation to export data only exporters are checked.
pub fn drop_incomplete_countries(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
    force: bool,
) -> Result<usize> {
    let operation = Operation::DropIncompleteCountries;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    ensure_dependency(dataset, operation, Operation::AddIso3Code, |ds| {
        add_iso3_code(ds, concordance)
    })?;
    dataset.ensure_complete(operation, force)?;

    let df = dataset.data();
    let years = column_i32s(df, columns::YEAR)?;
    let code_columns: Vec<Vec<String>> = [columns::EXPORTER_ISO3C, columns::IMPORTER_ISO3C]
        .into_iter()
        .filter(|name| df.column(name).is_ok())
        .map(|name| column_strings(df, name))
        .collect::<Result<_, _>>()?;

    let mut presence: BTreeMap<&str, BTreeSet<i32>> = BTreeMap::new();
    for codes in &code_columns {
        for (code, year) in codes.iter().zip(&years) {
            if let Some(year) = year {
                presence.entry(code.as_str()).or_default().insert(*year);
            }
        }
    }
    let loaded = dataset.years();
    let incomplete: BTreeSet<&str> = presence
        .iter()
        .filter(|(_, seen)| !loaded.iter().all(|year| seen.contains(year)))
        .map(|(code, _)| *code)
        .collect();
    for code in &incomplete {
        warn!(operation = %operation, country = code, "country missing from some years");
    }

    let mask: Vec<bool> = (0..df.height())
        .map(|row| {
            code_columns
                .iter()
                .all(|codes| !incomplete.contains(codes[row].as_str()))
        })
        .collect();
    let (filtered, dropped) = filter_rows(df, &mask)?;
    dataset.replace_data(filtered);
    dataset.record(operation);
    log_applied(operation, dropped, dataset.height());
    Ok(dropped)
}
