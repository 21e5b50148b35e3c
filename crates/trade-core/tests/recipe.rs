mod common;

use polars::prelude::*;

use trade_common::{column_bools, column_f64s, column_strings};
use trade_core::transforms::{countries_only, merge_adjustment_data};
use trade_core::{
    DependencyPolicy, RecipeConfig, TradeDataset, TransformError, construct_dataset, preset,
    presets,
};
use trade_model::DataType;

use common::*;

fn two_years() -> TradeDataset {
    TradeDataset::new(raw_frame(&two_year_rows()), [1962, 1963])
}

fn forced(name: &str) -> RecipeConfig {
    preset(name).expect("preset").config.with_force(true)
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

fn value_of(df: &DataFrame, filter: impl Fn(usize) -> bool) -> f64 {
    column_f64s(df, "value")
        .unwrap()
        .into_iter()
        .enumerate()
        .filter(|(row, _)| filter(*row))
        .filter_map(|(_, value)| value)
        .sum()
}

#[test]
fn trade_recipe_keeps_official_country_pairs() {
    let conc = concordance();
    let ds = two_years();
    let out = construct_dataset(
        &ds,
        &forced("SC_CNTRY_SR2L3_Y62to00_A"),
        DataType::Trade,
        &conc,
    )
    .expect("construct");

    let df = &out.frame;
    assert_eq!(names(df), ["year", "eiso3c", "iiso3c", "sitc3", "value"]);
    assert_eq!(df.height(), 7);
    let exporters = column_strings(df, "eiso3c").unwrap();
    let importers = column_strings(df, "iiso3c").unwrap();
    for code in exporters.iter().chain(&importers) {
        assert!(code != "WLD" && code != ".");
    }
    assert!(importers.contains(&"DDR".to_string()));

    let coverage = out.coverage.get(1962).expect("1962 coverage");
    assert_eq!(coverage.output_value, 1110.0);
    assert_eq!(coverage.world_value, Some(2000.0));
    assert_eq!(coverage.coverage_pct, Some(55.5));

    assert!(ds.ledger().is_empty());
    assert_eq!(ds.height(), two_year_rows().len());
    assert!(out.ledger.has_run_named("collapse_to_product_level[3]"));
}

#[test]
fn recipe_output_is_deterministic() {
    let conc = concordance();
    let ds = two_years();
    let config = forced("SC_CNTRY_SR2L2_Y62to00_D");
    let first = construct_dataset(&ds, &config, DataType::Trade, &conc).unwrap();
    let second = construct_dataset(&ds, &config, DataType::Trade, &conc).unwrap();
    assert!(first.frame.equals_missing(&second.frame));
    assert_eq!(first.ledger, second.ledger);
}

#[test]
fn flagged_variant_keeps_official_column() {
    let conc = concordance();
    let out = construct_dataset(
        &two_years(),
        &forced("SC_CNTRY_SR2L3_Y62to00_B"),
        DataType::Trade,
        &conc,
    )
    .unwrap();
    assert_eq!(
        names(&out.frame),
        ["year", "eiso3c", "iiso3c", "sitc3", "value", "official"]
    );
    let flags = column_bools(&out.frame, "official").unwrap();
    assert!(flags.iter().all(|flag| *flag == Some(true)));
    assert_eq!(out.coverage.get(1962).unwrap().output_value, 1150.0);
}

#[test]
fn consistent_variant_recodes_countries() {
    let conc = concordance();
    let out = construct_dataset(
        &two_years(),
        &forced("SC_CNTRY_SR2L3_Y62to00_C"),
        DataType::Trade,
        &conc,
    )
    .unwrap();
    let df = &out.frame;
    let importers = column_strings(df, "iiso3c").unwrap();
    let years = trade_common::column_i32s(df, "year").unwrap();
    assert!(!importers.contains(&"DDR".to_string()));
    let germany_1962 = value_of(df, |row| importers[row] == "DEU" && years[row] == Some(1962));
    assert_eq!(germany_1962, 110.0);
    assert!(out.executed_steps.contains(&"drop_incomplete".to_string()));
}

#[test]
fn export_and_import_recipes_sum_out_partner() {
    let conc = concordance();
    let ds = two_years();
    let config = forced("SC_CNTRY_SR2L1_Y62to00_A");

    let exports = construct_dataset(&ds, &config, DataType::Export, &conc).unwrap();
    assert_eq!(names(&exports.frame), ["year", "eiso3c", "sitc1", "value"]);
    let exporters = column_strings(&exports.frame, "eiso3c").unwrap();
    let years = trade_common::column_i32s(&exports.frame, "year").unwrap();
    let usa_1963 = value_of(&exports.frame, |row| {
        exporters[row] == "USA" && years[row] == Some(1963)
    });
    assert_eq!(usa_1963, 750.0);

    let imports = construct_dataset(&ds, &config, DataType::Import, &conc).unwrap();
    assert_eq!(names(&imports.frame), ["year", "iiso3c", "sitc1", "value"]);
    let importers = column_strings(&imports.frame, "iiso3c").unwrap();
    assert!(!importers.contains(&".".to_string()));
    assert!(!importers.contains(&"WLD".to_string()));
}

#[test]
fn every_preset_builds_for_every_data_type() {
    let conc = concordance();
    let ds = two_years();
    for preset in presets() {
        for data_type in DataType::ALL {
            let out = construct_dataset(&ds, &preset.config.with_force(true), data_type, &conc)
                .unwrap_or_else(|e| panic!("{} {data_type}: {e}", preset.name));
            let product = preset.config.level.column_name();
            assert!(out.frame.column(&product).is_ok(), "{}", preset.name);
            assert_eq!(out.coverage.years.len(), 2);
        }
    }
}

#[test]
fn refuses_partial_or_transformed_input() {
    let conc = concordance();
    let config = preset("SC_CNTRY_SR2L3_Y62to00_A").unwrap().config;
    let ds = two_years();
    assert!(matches!(
        construct_dataset(&ds, &config, DataType::Trade, &conc),
        Err(TransformError::IncompleteDataset { .. })
    ));

    let mut touched = two_years().with_policy(DependencyPolicy::AutoApply);
    countries_only(&mut touched, &conc).unwrap();
    assert!(matches!(
        construct_dataset(&touched, &config, DataType::Trade, &conc),
        Err(TransformError::NotPristine { .. })
    ));

    let invalid = RecipeConfig {
        require_official: false,
        ..config
    };
    assert!(matches!(
        construct_dataset(&ds, &invalid, DataType::Trade, &conc),
        Err(TransformError::Configuration(_))
    ));
}

#[test]
fn complete_input_needs_no_force() {
    let conc = concordance();
    let rows: Vec<Row<'_>> = (1962..=2000)
        .flat_map(|year| {
            [
                (year, WORLD, WORLD, "0011", 100.0),
                (year, FRANCE, USA, "0011", 25.0),
                (year, USA, FRANCE, "0012", 15.0),
            ]
        })
        .collect();
    let ds = TradeDataset::new(raw_frame(&rows), 1962..=2000);
    assert!(ds.is_complete());
    let out = construct_dataset(
        &ds,
        &preset("SC_CNTRY_SR2L3_Y62to00_C").unwrap().config,
        DataType::Trade,
        &conc,
    )
    .expect("construct");
    assert_eq!(out.frame.height(), 39 * 2);
    for year in &out.coverage.years {
        assert_eq!(year.coverage_pct, Some(40.0));
    }
}

#[test]
fn adjusted_input_counts_as_untransformed() {
    let conc = concordance();
    let rows: Vec<Row<'_>> = (1962..=2000)
        .flat_map(|year| {
            [
                (year, WORLD, WORLD, "0011", 100.0),
                (year, FRANCE, USA, "0011", 25.0),
                (year, USA, FRANCE, "0012", 15.0),
            ]
        })
        .collect();
    let mut ds = TradeDataset::new(raw_frame(&rows), 1962..=2000);
    let adjustment = raw_frame(&[(1962, FRANCE, USA, "0011", 35.0)])
        .select(["year", "icode", "ecode", "sitc", "unit", "dot", "value"])
        .unwrap();
    merge_adjustment_data(&mut ds, &adjustment).unwrap();
    assert!(ds.is_pristine());

    let out = construct_dataset(
        &ds,
        &preset("SC_CNTRY_SR2L3_Y62to00_C").unwrap().config,
        DataType::Trade,
        &conc,
    )
    .expect("construct");
    assert!(out.ledger.has_run_named("merge_adjustment_data"));
    assert_eq!(out.coverage.get(1962).unwrap().coverage_pct, Some(50.0));
    assert_eq!(out.coverage.get(1963).unwrap().coverage_pct, Some(40.0));
}
