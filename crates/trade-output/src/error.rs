use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;
use trade_model::DataType;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{data_type} table is missing column '{column}'")]
    MissingColumn { data_type: DataType, column: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T, E = OutputError> = std::result::Result<T, E>;
