//! Output adapter for constructed trade datasets.
//!
//! Recipe frames are wrapped in [`TradeData`], [`ExportData`] or
//! [`ImportData`], which check the column contract of their data type, and
//! written as CSV.

mod csv;
mod error;
mod tables;

pub use csv::{output_file_name, write_csv, write_output};
pub use error::{OutputError, Result};
pub use tables::{
    ExportData, ImportData, OutputData, OutputTable, TradeData, contract_columns,
};
