use polars::prelude::DataFrame;
use tracing::info;

use trade_concordance::CodeConcordance;
use trade_model::{DataType, QualityReport, SOURCE_FIRST_YEAR, SOURCE_LAST_YEAR, columns};

use crate::dataset::TradeDataset;
use crate::error::{Result, TransformError};
use crate::ledger::OperationLedger;
use crate::recipe::config::RecipeConfig;
use crate::recipe::coverage::CoverageReport;
use crate::recipe::pipeline::{RecipeContext, RecipePipeline, build_default_pipeline};

const OPERATION: &str = "construct_dataset";

/// A constructed dataset and everything that explains it.
#[derive(Debug, Clone)]
pub struct RecipeOutput {
    pub data_type: DataType,
    pub config: RecipeConfig,
    /// Output table in the fixed column order of the data type.
    pub frame: DataFrame,
    /// Operations applied to the working copy.
    pub ledger: OperationLedger,
    pub executed_steps: Vec<String>,
    pub coverage: CoverageReport,
    pub quality: QualityReport,
}

/// Builds one self-contained dataset from a loaded source.
///
/// The input is never modified; the recipe runs on a fresh copy. Unless
/// `config.force` is set, the input must cover the full source range and be
/// untransformed. Untransformed means an empty ledger or one holding only
/// `merge_adjustment_data`, so corrected source data can be fed straight
/// in; any other recorded operation fails with `NotPristine`.
pub fn construct_dataset(
    dataset: &TradeDataset,
    config: &RecipeConfig,
    data_type: DataType,
    concordance: &CodeConcordance,
) -> Result<RecipeOutput> {
    construct_with_pipeline(
        &build_default_pipeline(),
        dataset,
        config,
        data_type,
        concordance,
    )
}

pub fn construct_with_pipeline(
    pipeline: &RecipePipeline,
    dataset: &TradeDataset,
    config: &RecipeConfig,
    data_type: DataType,
    concordance: &CodeConcordance,
) -> Result<RecipeOutput> {
    config.validate()?;
    if !config.force && !dataset.is_pristine() {
        return Err(TransformError::NotPristine {
            operation: OPERATION.to_string(),
            ledger: dataset.ledger().to_string(),
        });
    }
    if !config.force && !dataset.is_complete() {
        return Err(TransformError::IncompleteDataset {
            operation: OPERATION.to_string(),
            loaded: dataset.years().len(),
            expected: usize::try_from(SOURCE_LAST_YEAR - SOURCE_FIRST_YEAR + 1).unwrap_or(0),
        });
    }

    let mut working = dataset.fresh_copy();
    let ctx = RecipeContext {
        config,
        data_type,
        concordance,
    };
    let state = pipeline.execute(&mut working, &ctx)?;
    let frame = finalize_columns(working.data(), config, data_type)?;

    let coverage =
        CoverageReport::compute(dataset.data(), &frame, dataset.years(), concordance)?;
    coverage.log(data_type.as_str());
    info!(
        data_type = %data_type,
        level = %config.level,
        rows = frame.height(),
        ledger = %working.ledger(),
        "dataset constructed"
    );
    Ok(RecipeOutput {
        data_type,
        config: *config,
        frame,
        ledger: working.ledger().clone(),
        executed_steps: state.executed_steps,
        coverage,
        quality: working.quality().clone(),
    })
}

/// Renames `sitc` to `sitc{L}` and orders columns as
/// `year, [eiso3c], [iiso3c], sitc{L}, value, [official]`.
fn finalize_columns(
    df: &DataFrame,
    config: &RecipeConfig,
    data_type: DataType,
) -> Result<DataFrame> {
    let product = config.level.column_name();
    let mut renamed = df.clone();
    renamed.rename(columns::PRODUCT_CODE, product.as_str().into())?;

    let mut order: Vec<&str> = vec![columns::YEAR];
    order.extend_from_slice(data_type.country_columns());
    order.push(product.as_str());
    order.push(columns::VALUE);
    if renamed.column(columns::OFFICIAL).is_ok() {
        order.push(columns::OFFICIAL);
    }
    Ok(renamed.select(order)?)
}
