//! Shared utilities for trade crates.
//!
//! This crate provides common utilities used across the trade workspace,
//! including Polars DataFrame helpers.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_to_string, column_bools, column_f64s, column_i32s, column_strings, format_numeric,
    has_column, parse_f64,
};
