//! Self-contained dataset recipes.

pub mod assemble;
pub mod config;
pub mod coverage;
pub mod pipeline;

pub use assemble::{RecipeOutput, construct_dataset, construct_with_pipeline};
pub use config::{PresetVariant, RecipeConfig, RecipePreset, preset, presets};
pub use coverage::{CoverageReport, YearCoverage, world_totals};
pub use pipeline::{
    ConstructionStep, RecipeContext, RecipePipeline, RecipeState, build_default_pipeline,
};
