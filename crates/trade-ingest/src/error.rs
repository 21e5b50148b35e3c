use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("source file for {year} not found: {path}")]
    MissingSource { year: i32, path: PathBuf },
    #[error("no cached frame for {year} at {path}")]
    CacheMiss { year: i32, path: PathBuf },
    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path} line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
    #[error("year {0} is outside the source range 1962-2000")]
    UnknownYear(i32),
    #[error("no years requested")]
    NoYears,
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
