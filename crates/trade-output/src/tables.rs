//! Typed wrappers enforcing the fixed output column contract.
//!
//! | data type | columns |
//! |-----------|---------|
//! | trade  | `year, eiso3c, iiso3c, sitc{L}, value` |
//! | export | `year, eiso3c, sitc{L}, value` |
//! | import | `year, iiso3c, sitc{L}, value` |
//!
//! Each may carry a trailing `official` flag. Other columns are dropped.

use polars::prelude::DataFrame;

use trade_core::RecipeOutput;
use trade_model::{DataType, ProductLevel, columns};

use crate::error::{OutputError, Result};

/// Columns required by `data_type` at `level`, in output order.
pub fn contract_columns(data_type: DataType, level: ProductLevel) -> Vec<String> {
    let mut out = vec![columns::YEAR.to_string()];
    out.extend(data_type.country_columns().iter().map(|c| c.to_string()));
    out.push(level.column_name());
    out.push(columns::VALUE.to_string());
    out
}

fn conform(df: &DataFrame, data_type: DataType, level: ProductLevel) -> Result<DataFrame> {
    let mut order = contract_columns(data_type, level);
    if let Some(missing) = order.iter().find(|name| df.column(name.as_str()).is_err()) {
        return Err(OutputError::MissingColumn {
            data_type,
            column: missing.clone(),
        });
    }
    if df.column(columns::OFFICIAL).is_ok() {
        order.push(columns::OFFICIAL.to_string());
    }
    Ok(df.select(order)?)
}

/// Shared surface of the three output tables.
pub trait OutputTable {
    const DATA_TYPE: DataType;

    fn frame(&self) -> &DataFrame;

    fn level(&self) -> ProductLevel;

    fn has_official_flag(&self) -> bool {
        self.frame().column(columns::OFFICIAL).is_ok()
    }
}

macro_rules! output_table {
    ($(#[$meta:meta])* $name:ident, $data_type:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            frame: DataFrame,
            level: ProductLevel,
        }

        impl $name {
            pub fn new(frame: &DataFrame, level: ProductLevel) -> Result<Self> {
                Ok(Self {
                    frame: conform(frame, $data_type, level)?,
                    level,
                })
            }

            pub fn into_frame(self) -> DataFrame {
                self.frame
            }
        }

        impl OutputTable for $name {
            const DATA_TYPE: DataType = $data_type;

            fn frame(&self) -> &DataFrame {
                &self.frame
            }

            fn level(&self) -> ProductLevel {
                self.level
            }
        }
    };
}

output_table!(
    /// Bilateral flows: exporter, importer and product per year.
    TradeData,
    DataType::Trade
);
output_table!(
    /// Exports per exporter and product, importers summed out.
    ExportData,
    DataType::Export
);
output_table!(
    /// Imports per importer and product, exporters summed out.
    ImportData,
    DataType::Import
);

/// Any of the three output tables, as produced by a recipe.
#[derive(Debug, Clone)]
pub enum OutputData {
    Trade(TradeData),
    Export(ExportData),
    Import(ImportData),
}

impl OutputData {
    pub fn from_frame(frame: &DataFrame, data_type: DataType, level: ProductLevel) -> Result<Self> {
        Ok(match data_type {
            DataType::Trade => Self::Trade(TradeData::new(frame, level)?),
            DataType::Export => Self::Export(ExportData::new(frame, level)?),
            DataType::Import => Self::Import(ImportData::new(frame, level)?),
        })
    }

    pub fn from_recipe(output: &RecipeOutput) -> Result<Self> {
        Self::from_frame(&output.frame, output.data_type, output.config.level)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::Trade(_) => TradeData::DATA_TYPE,
            Self::Export(_) => ExportData::DATA_TYPE,
            Self::Import(_) => ImportData::DATA_TYPE,
        }
    }

    pub fn frame(&self) -> &DataFrame {
        match self {
            Self::Trade(table) => table.frame(),
            Self::Export(table) => table.frame(),
            Self::Import(table) => table.frame(),
        }
    }

    pub fn level(&self) -> ProductLevel {
        match self {
            Self::Trade(table) => table.level(),
            Self::Export(table) => table.level(),
            Self::Import(table) => table.level(),
        }
    }
}
