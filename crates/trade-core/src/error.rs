use polars::prelude::PolarsError;
use thiserror::Error;
use trade_model::MalformedCodeError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{operation} requires {missing} to have run first")]
    Precondition { operation: String, missing: String },

    #[error("{operation} requires an untransformed dataset, but the ledger holds: {ledger}")]
    NotPristine { operation: String, ledger: String },

    #[error(
        "{operation} requires the full source year range (loaded {loaded} of {expected} years); use force to override"
    )]
    IncompleteDataset {
        operation: String,
        loaded: usize,
        expected: usize,
    },

    #[error("split_country_code aborted: {0}")]
    MalformedCode(#[from] MalformedCodeError),

    #[error("cannot collapse to product level {requested}: dataset is at level {current}")]
    InvalidLevel { requested: u8, current: u8 },

    #[error("raw snapshot was discarded by reduce_memory")]
    RawDataDiscarded,

    #[error("adjustment table has duplicate key {key}")]
    DuplicateAdjustmentKey { key: String },

    #[error("{operation} needs column '{column}'")]
    MissingColumn { operation: String, column: String },

    #[error("invalid recipe configuration: {0}")]
    Configuration(String),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
