use std::fs;
use std::path::Path;

use trade_common::{column_f64s, column_strings};
use trade_ingest::{
    LoadError, LoadPolicy, SourceConfig, load_adjustment_table, load_years, read_source_year,
};

const HEADER: &str = "year,icode,importer,ecode,exporter,sitc4,unit,dot,value,quantity\n";

fn write_year(dir: &Path, year: i32, rows: &[&str]) {
    let mut contents = HEADER.to_string();
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(dir.join(format!("wtf{:02}.csv", year % 100)), contents).expect("write source");
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_year(
        dir.path(),
        1962,
        &[
            "1962,100000,World,218420,USA,0011,N,1,500,",
            "1962,100000,World,218420,USA,0012,N,1,300,12.5",
        ],
    );
    write_year(dir.path(), 1963, &["1963,532510,France,218420,USA,0011,,,700,"]);
    dir
}

#[test]
fn reads_source_file_into_raw_frame() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    let frame = read_source_year(&config.source_file(1962), 1962).expect("read source");
    assert_eq!(frame.height(), 2);
    assert_eq!(
        column_strings(&frame, "sitc").expect("sitc"),
        vec!["0011", "0012"]
    );
    assert_eq!(
        column_f64s(&frame, "quantity").expect("quantity"),
        vec![None, Some(12.5)]
    );
}

#[test]
fn source_only_stacks_years_in_order() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    let loaded = load_years(&config, [1963, 1962], LoadPolicy::SourceOnly).expect("load");
    assert_eq!(loaded.years.iter().copied().collect::<Vec<_>>(), vec![1962, 1963]);
    assert_eq!(loaded.frame.height(), 3);
    assert!(!config.cache_file(1962).exists());
}

#[test]
fn cache_or_source_writes_then_reads_cache() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    let policy = LoadPolicy::CacheOrSource {
        rebuild_cache: false,
    };
    let first = load_years(&config, [1962], policy).expect("first load");
    assert!(config.cache_file(1962).exists());

    // The cache now answers even without the source file.
    fs::remove_file(config.source_file(1962)).expect("remove source");
    let second = load_years(&config, [1962], LoadPolicy::CacheOnly).expect("cached load");
    assert!(first.frame.equals_missing(&second.frame));
}

#[test]
fn cache_only_reports_miss() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    let err = load_years(&config, [1962], LoadPolicy::CacheOnly).unwrap_err();
    assert!(matches!(err, LoadError::CacheMiss { year: 1962, .. }));
}

#[test]
fn rebuild_cache_reparses_source() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    load_years(
        &config,
        [1963],
        LoadPolicy::CacheOrSource {
            rebuild_cache: false,
        },
    )
    .expect("prime cache");
    write_year(dir.path(), 1963, &["1963,532510,France,218420,USA,0011,,,900,"]);
    let rebuilt = load_years(
        &config,
        [1963],
        LoadPolicy::CacheOrSource {
            rebuild_cache: true,
        },
    )
    .expect("rebuild");
    assert_eq!(
        column_f64s(&rebuilt.frame, "value").expect("value"),
        vec![Some(900.0)]
    );
    let cached = load_years(&config, [1963], LoadPolicy::CacheOnly).expect("cached");
    assert!(rebuilt.frame.equals_missing(&cached.frame));
}

#[test]
fn missing_source_and_bad_years() {
    let dir = fixture();
    let config = SourceConfig::new(dir.path());
    let err = load_years(&config, [1970], LoadPolicy::SourceOnly).unwrap_err();
    assert!(matches!(err, LoadError::MissingSource { year: 1970, .. }));
    let err = load_years(&config, [1950], LoadPolicy::SourceOnly).unwrap_err();
    assert!(matches!(err, LoadError::UnknownYear(1950)));
    let err = load_years(&config, Vec::new(), LoadPolicy::SourceOnly).unwrap_err();
    assert!(matches!(err, LoadError::NoYears));
}

#[test]
fn invalid_value_reports_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_year(dir.path(), 1962, &["1962,100000,World,218420,USA,0011,N,1,abc,"]);
    let config = SourceConfig::new(dir.path());
    let err = load_years(&config, [1962], LoadPolicy::SourceOnly).unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { ref column, .. } if column == "value"));
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("wtf62.csv"), "year,icode,ecode\n1962,100000,218420\n")
        .expect("write");
    let config = SourceConfig::new(dir.path());
    let err = load_years(&config, [1962], LoadPolicy::SourceOnly).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { .. }));
}

#[test]
fn adjustment_table_keeps_optional_quantity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let with_quantity = dir.path().join("adjust_q.csv");
    fs::write(
        &with_quantity,
        "year,icode,ecode,sitc4,unit,dot,value,quantity\n1962,100000,218420,0011,N,1,650,3\n",
    )
    .expect("write");
    let frame = load_adjustment_table(&with_quantity).expect("load");
    assert_eq!(frame.width(), 8);

    let values_only = dir.path().join("adjust.csv");
    fs::write(
        &values_only,
        "year,icode,ecode,sitc,unit,dot,value\n1962,100000,218420,0011,N,1,650\n",
    )
    .expect("write");
    let frame = load_adjustment_table(&values_only).expect("load");
    assert_eq!(frame.width(), 7);
    assert!(frame.column("quantity").is_err());
}
