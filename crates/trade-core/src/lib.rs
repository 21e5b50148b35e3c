pub mod dataset;
pub mod error;
mod frame_utils;
pub mod ledger;
pub mod recipe;
pub mod transforms;

pub use dataset::{DependencyPolicy, TradeDataset, load_dataset};
pub use error::TransformError;
pub use ledger::OperationLedger;
pub use recipe::{
    CoverageReport, PresetVariant, RecipeConfig, RecipeOutput, RecipePreset, construct_dataset,
    preset, presets,
};
