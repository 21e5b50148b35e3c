//! Per-year coverage of a recipe's output against world trade totals.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use trade_common::{column_f64s, column_i32s, column_strings, has_column};
use trade_concordance::{CodeConcordance, CompositeCountryCode};
use trade_model::columns;

use crate::error::Result;
use crate::frame_utils::value_by_year;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCoverage {
    pub year: i32,
    pub output_value: f64,
    /// Value of rows where both sides are the world aggregate.
    pub world_value: Option<f64>,
    /// `output_value * 100 / world_value`; `None` without a positive world total.
    pub coverage_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    pub years: Vec<YearCoverage>,
}

impl CoverageReport {
    pub fn compute(
        input: &DataFrame,
        output: &DataFrame,
        years: &BTreeSet<i32>,
        concordance: &CodeConcordance,
    ) -> Result<Self> {
        let world = world_totals(input, concordance)?;
        let produced = value_by_year(output)?;
        let years = years
            .iter()
            .map(|&year| {
                let output_value = produced.get(&year).copied().unwrap_or(0.0);
                let world_value = world.get(&year).copied();
                let coverage_pct = world_value
                    .filter(|total| *total > 0.0)
                    .map(|total| output_value * 100.0 / total);
                YearCoverage {
                    year,
                    output_value,
                    world_value,
                    coverage_pct,
                }
            })
            .collect();
        Ok(Self { years })
    }

    pub fn get(&self, year: i32) -> Option<&YearCoverage> {
        self.years.iter().find(|entry| entry.year == year)
    }

    pub fn log(&self, label: &str) {
        for entry in &self.years {
            info!(
                label,
                year = entry.year,
                output_value = entry.output_value,
                world_value = entry.world_value,
                coverage_pct = entry.coverage_pct,
                "coverage"
            );
        }
    }
}

/// World trade per year: rows where importer and exporter are both `WLD`.
///
/// Raw frames are judged by their composite codes; frames that already
/// carry alpha codes use those. Undecodable codes never count as world.
pub fn world_totals(df: &DataFrame, concordance: &CodeConcordance) -> Result<BTreeMap<i32, f64>> {
    let is_world: Vec<bool> = if has_column(df, columns::IMPORTER_ISO3C)
        && has_column(df, columns::EXPORTER_ISO3C)
    {
        let importers = column_strings(df, columns::IMPORTER_ISO3C)?;
        let exporters = column_strings(df, columns::EXPORTER_ISO3C)?;
        importers
            .iter()
            .zip(&exporters)
            .map(|(i, e)| i == columns::WORLD && e == columns::WORLD)
            .collect()
    } else if has_column(df, columns::IMPORTER_CODE) && has_column(df, columns::EXPORTER_CODE) {
        let world_code = |code: &str| {
            CompositeCountryCode::parse(code)
                .ok()
                .and_then(|parsed| concordance.iso3_alpha(parsed.numeric))
                == Some(columns::WORLD)
        };
        let importers = column_strings(df, columns::IMPORTER_CODE)?;
        let exporters = column_strings(df, columns::EXPORTER_CODE)?;
        importers
            .iter()
            .zip(&exporters)
            .map(|(i, e)| world_code(i) && world_code(e))
            .collect()
    } else {
        return Ok(BTreeMap::new());
    };

    let years = column_i32s(df, columns::YEAR)?;
    let values = column_f64s(df, columns::VALUE)?;
    let mut totals = BTreeMap::new();
    for ((year, value), world) in years.into_iter().zip(values).zip(is_world) {
        if let (true, Some(year), Some(value)) = (world, year, value) {
            *totals.entry(year).or_insert(0.0) += value;
        }
    }
    Ok(totals)
}
