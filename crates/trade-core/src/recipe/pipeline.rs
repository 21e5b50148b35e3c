//! Recipe construction pipeline with ordered step execution.
//!
//! Each step implements [`ConstructionStep`] and skips itself when the
//! recipe configuration does not ask for it.
//!
//! # Standard Step Order
//!
//! 1. **collapse_values** - drop quantities, sum duplicate values
//! 2. **country_codes** - split composite codes, add alpha codes
//! 3. **country_filter** - countries only (trade) or one reporting side
//! 4. **drop_alpha** - drop `A`/`X` product codes
//! 5. **official_codes** - flag, and optionally drop, non-official codes
//! 6. **product_level** - collapse to the output level
//! 7. **intertemporal_recode** - consistent country identities
//! 8. **aggregate** - sum to the data type's key
//! 9. **drop_incomplete** - balanced country panel

use polars::prelude::{NamedFrom, Series};

use trade_concordance::CodeConcordance;
use trade_model::{DataType, ProductLevel, columns};

use crate::dataset::TradeDataset;
use crate::error::Result;
use crate::frame_utils::{aggregate_sum, require_column};
use crate::recipe::config::RecipeConfig;
use crate::transforms::{
    add_iso3_code, collapse_to_product_level, collapse_to_values_only, countries_only,
    country_side_only, drop_alpha_codes, drop_incomplete_countries, drop_non_official_codes,
    mark_official_codes, official_flags, recode_intertemporal_country, split_country_code,
};

/// Read-only inputs shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct RecipeContext<'a> {
    pub config: &'a RecipeConfig,
    pub data_type: DataType,
    pub concordance: &'a CodeConcordance,
}

/// A single step of the construction pipeline.
pub trait ConstructionStep: Send + Sync {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        state: &mut RecipeState,
    ) -> Result<()>;

    fn step_name(&self) -> &str;

    fn should_skip(&self, _ctx: &RecipeContext<'_>) -> bool {
        false
    }
}

/// Mutable state shared across steps.
#[derive(Debug, Default)]
pub struct RecipeState {
    /// Steps that ran, in order.
    pub executed_steps: Vec<String>,
    /// Steps skipped by configuration.
    pub skipped_steps: Vec<String>,
}

pub struct RecipePipeline {
    steps: Vec<Box<dyn ConstructionStep>>,
}

impl Default for RecipePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipePipeline {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(mut self, step: Box<dyn ConstructionStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn remove_step(mut self, step_name: &str) -> Self {
        self.steps.retain(|s| s.step_name() != step_name);
        self
    }

    pub fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
    ) -> Result<RecipeState> {
        let mut state = RecipeState::default();
        for step in &self.steps {
            if step.should_skip(ctx) {
                state.skipped_steps.push(step.step_name().to_string());
                continue;
            }
            step.execute(dataset, ctx, &mut state)?;
            state.executed_steps.push(step.step_name().to_string());
        }
        Ok(state)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

/// The standard nine-step recipe.
pub fn build_default_pipeline() -> RecipePipeline {
    RecipePipeline::new()
        .add_step(Box::new(CollapseValuesStep))
        .add_step(Box::new(CountryCodesStep))
        .add_step(Box::new(CountryFilterStep))
        .add_step(Box::new(DropAlphaStep))
        .add_step(Box::new(OfficialCodesStep))
        .add_step(Box::new(ProductLevelStep))
        .add_step(Box::new(IntertemporalRecodeStep))
        .add_step(Box::new(AggregateStep))
        .add_step(Box::new(DropIncompleteStep))
}

pub struct CollapseValuesStep;

impl ConstructionStep for CollapseValuesStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        _ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        collapse_to_values_only(dataset).map(|_| ())
    }

    fn step_name(&self) -> &str {
        "collapse_values"
    }
}

pub struct CountryCodesStep;

impl ConstructionStep for CountryCodesStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        split_country_code(dataset)?;
        add_iso3_code(dataset, ctx.concordance)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "country_codes"
    }
}

pub struct CountryFilterStep;

impl ConstructionStep for CountryFilterStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        match ctx.data_type.reporting_side() {
            None => countries_only(dataset, ctx.concordance)?,
            Some(side) => country_side_only(dataset, ctx.concordance, side)?,
        };
        Ok(())
    }

    fn step_name(&self) -> &str {
        "country_filter"
    }
}

pub struct DropAlphaStep;

impl ConstructionStep for DropAlphaStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        _ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        drop_alpha_codes(dataset).map(|_| ())
    }

    fn step_name(&self) -> &str {
        "drop_alpha"
    }

    fn should_skip(&self, ctx: &RecipeContext<'_>) -> bool {
        !ctx.config.drop_alpha
    }
}

pub struct OfficialCodesStep;

impl ConstructionStep for OfficialCodesStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        mark_official_codes(dataset, ctx.concordance)?;
        if ctx.config.drop_non_official {
            drop_non_official_codes(dataset, ctx.concordance)?;
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "official_codes"
    }

    fn should_skip(&self, ctx: &RecipeContext<'_>) -> bool {
        !ctx.config.require_official
    }
}

pub struct ProductLevelStep;

impl ConstructionStep for ProductLevelStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        collapse_to_product_level(dataset, ctx.config.level.digits()).map(|_| ())
    }

    fn step_name(&self) -> &str {
        "product_level"
    }

    fn should_skip(&self, ctx: &RecipeContext<'_>) -> bool {
        ctx.config.level >= ProductLevel::RAW
    }
}

pub struct IntertemporalRecodeStep;

impl ConstructionStep for IntertemporalRecodeStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        recode_intertemporal_country(dataset, ctx.concordance, ctx.config.force).map(|_| ())
    }

    fn step_name(&self) -> &str {
        "intertemporal_recode"
    }

    fn should_skip(&self, ctx: &RecipeContext<'_>) -> bool {
        !ctx.config.intertemporal_recode
    }
}

/// Sums values to the data type's key: `(year, eiso3c, iiso3c, sitc)` for
/// trade, one side dropped for export and import data. When non-official
/// codes are kept, the `official` flag is recomputed at the output level.
pub struct AggregateStep;

impl ConstructionStep for AggregateStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        let mut keys = vec![columns::YEAR];
        keys.extend_from_slice(ctx.data_type.country_columns());
        keys.push(columns::PRODUCT_CODE);
        for key in &keys {
            require_column(dataset.data(), self.step_name(), key)?;
        }
        let mut aggregated = aggregate_sum(dataset.data(), &keys, &[columns::VALUE])?;
        if ctx.config.require_official && !ctx.config.drop_non_official {
            let flags = official_flags(&aggregated, self.step_name(), ctx.concordance)?;
            aggregated.with_column(Series::new(columns::OFFICIAL.into(), flags))?;
        }
        dataset.replace_data(aggregated);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "aggregate"
    }
}

pub struct DropIncompleteStep;

impl ConstructionStep for DropIncompleteStep {
    fn execute(
        &self,
        dataset: &mut TradeDataset,
        ctx: &RecipeContext<'_>,
        _state: &mut RecipeState,
    ) -> Result<()> {
        drop_incomplete_countries(dataset, ctx.concordance, ctx.config.force).map(|_| ())
    }

    fn step_name(&self) -> &str {
        "drop_incomplete"
    }

    fn should_skip(&self, ctx: &RecipeContext<'_>) -> bool {
        !ctx.config.drop_incomplete_coverage
    }
}
