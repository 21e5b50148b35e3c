#![allow(dead_code)]

use polars::prelude::*;
use trade_concordance::CodeConcordance;

pub const WORLD: &str = "100000";
pub const USA: &str = "218420";
pub const FRANCE: &str = "532510";
pub const WEST_GERMANY: &str = "532800";
pub const EAST_GERMANY: &str = "532780";
pub const JAPAN: &str = "663920";
pub const UNKNOWN: &str = "999990";

/// One raw row: `(year, icode, ecode, sitc, value)`.
pub type Row<'a> = (i32, &'a str, &'a str, &'a str, f64);

pub fn raw_frame(rows: &[Row<'_>]) -> DataFrame {
    let name = |code: &str| format!("Country {code}");
    DataFrame::new(vec![
        Series::new("year".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()).into_column(),
        Series::new("icode".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()).into_column(),
        Series::new(
            "importer".into(),
            rows.iter().map(|r| name(r.1)).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new("ecode".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()).into_column(),
        Series::new(
            "exporter".into(),
            rows.iter().map(|r| name(r.2)).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new("sitc".into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()).into_column(),
        Series::new(
            "unit".into(),
            rows.iter().map(|_| Some("N")).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new(
            "dot".into(),
            rows.iter().map(|_| Some("1")).collect::<Vec<_>>(),
        )
        .into_column(),
        Series::new("value".into(), rows.iter().map(|r| r.4).collect::<Vec<_>>()).into_column(),
        Series::new(
            "quantity".into(),
            rows.iter().map(|_| None::<f64>).collect::<Vec<_>>(),
        )
        .into_column(),
    ])
    .expect("raw frame")
}

pub fn concordance() -> CodeConcordance {
    let mut builder = CodeConcordance::builder()
        .country("000", "WLD", "World")
        .country("842", "USA", "United States")
        .country("251", "FRA", "France")
        .country("280", "DEU", "Germany")
        .country("278", "DDR", "East Germany")
        .country("392", "JPN", "Japan")
        .recode("WLD", "WLD")
        .recode("USA", "USA")
        .recode("FRA", "FRA")
        .recode("DEU", "DEU")
        .recode("DDR", "DEU");
    for code in ["0", "00", "001", "0011", "0012", "01", "011", "0111"] {
        builder = builder.official_sitc(code);
    }
    builder.build()
}

/// Two years of bilateral flows plus world totals.
pub fn two_year_rows() -> Vec<Row<'static>> {
    vec![
        (1962, WORLD, WORLD, "0011", 2000.0),
        (1962, FRANCE, USA, "0011", 500.0),
        (1962, FRANCE, USA, "0012", 300.0),
        (1962, WORLD, USA, "0011", 800.0),
        (1962, USA, FRANCE, "0111", 200.0),
        (1962, USA, FRANCE, "0119", 40.0),
        (1962, USA, WEST_GERMANY, "0011", 100.0),
        (1962, USA, EAST_GERMANY, "0011", 10.0),
        (1962, FRANCE, JAPAN, "001A", 70.0),
        (1963, WORLD, WORLD, "0011", 2500.0),
        (1963, FRANCE, USA, "0011", 600.0),
        (1963, USA, FRANCE, "0111", 250.0),
        (1963, USA, WEST_GERMANY, "0012", 120.0),
        (1963, UNKNOWN, USA, "0011", 30.0),
    ]
}
