use std::fs;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};
use trade_model::{DataType, ProductLevel};
use trade_output::{
    ExportData, OutputData, OutputError, OutputTable, TradeData, contract_columns,
    output_file_name, write_csv, write_output,
};

fn level3() -> ProductLevel {
    ProductLevel::new(3).expect("level")
}

fn trade_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("value".into(), vec![800.0, 200.0]).into_column(),
        Series::new("iiso3c".into(), vec!["FRA", "USA"]).into_column(),
        Series::new("eiso3c".into(), vec!["USA", "FRA"]).into_column(),
        Series::new("sitc3".into(), vec!["001", "011"]).into_column(),
        Series::new("year".into(), vec![1962i32, 1962]).into_column(),
        Series::new("dot".into(), vec!["1", "1"]).into_column(),
    ])
    .expect("frame")
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn trade_table_orders_contract_columns() {
    let table = TradeData::new(&trade_frame(), level3()).expect("trade table");
    assert_eq!(
        names(table.frame()),
        ["year", "eiso3c", "iiso3c", "sitc3", "value"]
    );
    assert!(!table.has_official_flag());
    assert_eq!(
        contract_columns(DataType::Import, level3()),
        ["year", "iiso3c", "sitc3", "value"]
    );
}

#[test]
fn rejects_missing_contract_column() {
    let err = ExportData::new(&trade_frame(), ProductLevel::new(2).expect("level")).unwrap_err();
    match err {
        OutputError::MissingColumn { data_type, column } => {
            assert_eq!(data_type, DataType::Export);
            assert_eq!(column, "sitc2");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn keeps_official_flag_last() {
    let mut frame = trade_frame();
    frame
        .with_column(Series::new("official".into(), vec![true, false]))
        .expect("official");
    let data = OutputData::from_frame(&frame, DataType::Trade, level3()).expect("output");
    assert_eq!(names(data.frame()).last().map(String::as_str), Some("official"));
}

#[test]
fn writes_csv_with_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = OutputData::from_frame(&trade_frame(), DataType::Export, level3()).expect("output");
    assert_eq!(
        output_file_name("SC_CNTRY_SR2L3_Y62to00_A", &data),
        "SC_CNTRY_SR2L3_Y62to00_A_export.csv"
    );
    let path = write_output(&dir.path().join("nested"), "SC_CNTRY_SR2L3_Y62to00_A", &data)
        .expect("write");
    let contents = fs::read_to_string(&path).expect("read back");
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("year,eiso3c,sitc3,value"));
    let first = lines.next().expect("data row");
    assert!(first.starts_with("1962,USA,001,800"), "{first}");
    assert_eq!(lines.count(), 1);
}

#[test]
fn write_fails_on_unwritable_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").expect("blocker");
    let data = OutputData::from_frame(&trade_frame(), DataType::Trade, level3()).expect("output");
    let err = write_csv(&blocker.join("out.csv"), &data).unwrap_err();
    assert!(matches!(err, OutputError::Io { .. }));
}
