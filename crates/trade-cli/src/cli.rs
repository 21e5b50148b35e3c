//! CLI argument definitions for the trade dataset builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "trade-prep",
    version,
    about = "Build self-contained datasets from NBER-Feenstra World Trade Flows",
    long_about = "Build self-contained country-level datasets from the NBER-Feenstra\n\
                  World Trade Flows source files (1962-2000).\n\n\
                  Each recipe standardizes country codes, filters and aggregates\n\
                  products, and writes trade, export or import tables as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load source years and build recipe datasets.
    Build(BuildArgs),

    /// List the named recipe presets.
    Recipes,

    /// Verify reference tables against their manifest checksums.
    VerifyReference(ReferenceArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Directory holding the `wtf{yy}.csv` source files.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Parquet cache directory (default: <SOURCE_DIR>/cache).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Output directory for CSV tables (default: <SOURCE_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Recipe preset to build; repeat for several (default: all presets).
    #[arg(long = "recipe", value_name = "NAME")]
    pub recipes: Vec<String>,

    /// Data type to build; repeat for several (default: all three).
    #[arg(long = "data-type", value_enum)]
    pub data_types: Vec<DataTypeArg>,

    /// First year to load.
    #[arg(long = "first-year", default_value_t = trade_model::SOURCE_FIRST_YEAR)]
    pub first_year: i32,

    /// Last year to load.
    #[arg(long = "last-year", default_value_t = trade_model::SOURCE_LAST_YEAR)]
    pub last_year: i32,

    /// Where source years are read from.
    #[arg(long = "load", value_enum, default_value = "cache-or-source")]
    pub load: LoadArg,

    /// Rewrite cache files from source (only with `--load cache-or-source`).
    #[arg(long = "rebuild-cache")]
    pub rebuild_cache: bool,

    /// Correction table merged into the source before any recipe runs.
    #[arg(long = "adjustment", value_name = "CSV")]
    pub adjustment: Option<PathBuf>,

    /// Reference table directory (default: $TRADE_REFERENCE_DIR or bundled).
    #[arg(long = "reference-dir", value_name = "DIR")]
    pub reference_dir: Option<PathBuf>,

    /// Build from a partial year range.
    ///
    /// Recipes normally refuse input that does not cover 1962-2000, since
    /// intertemporal recodes and balanced panels are only meaningful over
    /// the full range.
    #[arg(long = "force")]
    pub force: bool,

    /// Build and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the build summary as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ReferenceArgs {
    /// Reference table directory (default: $TRADE_REFERENCE_DIR or bundled).
    #[arg(long = "reference-dir", value_name = "DIR")]
    pub reference_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DataTypeArg {
    Trade,
    Export,
    Import,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LoadArg {
    Source,
    Cache,
    CacheOrSource,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
