//! The working trade dataset and its lifecycle.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::info;

use trade_ingest::{LoadError, LoadPolicy, SourceConfig, load_years};
use trade_model::{
    DataQualityIssue, Operation, ProductLevel, QualityReport, SOURCE_FIRST_YEAR,
    SOURCE_LAST_YEAR, source_years,
};

use crate::error::{Result, TransformError};
use crate::ledger::OperationLedger;

/// What a transformation does when a dependency has not run yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyPolicy {
    /// Fail with [`TransformError::Precondition`].
    #[default]
    Strict,
    /// Run the missing dependency first and log it.
    AutoApply,
}

/// A trade table plus the state that governs which transformations may run.
///
/// The raw snapshot taken at load time is never mutated. Working data is
/// replaced wholesale by each transformation.
#[derive(Debug, Clone)]
pub struct TradeDataset {
    data: DataFrame,
    raw: Option<DataFrame>,
    years: BTreeSet<i32>,
    level: ProductLevel,
    ledger: OperationLedger,
    complete: bool,
    policy: DependencyPolicy,
    quality: QualityReport,
}

impl TradeDataset {
    pub fn new(data: DataFrame, years: impl IntoIterator<Item = i32>) -> Self {
        let years: BTreeSet<i32> = years.into_iter().collect();
        let complete = source_years().all(|year| years.contains(&year));
        Self {
            raw: Some(data.clone()),
            data,
            years,
            level: ProductLevel::RAW,
            ledger: OperationLedger::new(),
            complete,
            policy: DependencyPolicy::default(),
            quality: QualityReport::default(),
        }
    }

    pub fn with_policy(mut self, policy: DependencyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    pub fn level(&self) -> ProductLevel {
        self.level
    }

    pub fn ledger(&self) -> &OperationLedger {
        &self.ledger
    }

    pub fn policy(&self) -> DependencyPolicy {
        self.policy
    }

    pub fn quality(&self) -> &QualityReport {
        &self.quality
    }

    /// True when every year of the source range is loaded.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// True when nothing but an adjustment merge has touched the data.
    pub fn is_pristine(&self) -> bool {
        let merge = Operation::MergeAdjustmentData.name();
        self.ledger.entries().iter().all(|entry| *entry == merge)
    }

    /// Independent copy for a recipe run. Frames are copy-on-write, so this
    /// does not duplicate column buffers.
    pub fn fresh_copy(&self) -> Self {
        self.clone()
    }

    /// A copy of the snapshot taken at load time.
    pub fn raw_data(&self) -> Result<DataFrame> {
        self.raw.clone().ok_or(TransformError::RawDataDiscarded)
    }

    /// Rolls working data, ledger, level and issues back to the load-time state.
    pub fn reset_dataset(&mut self) -> Result<()> {
        self.data = self.raw_data()?;
        self.ledger.clear();
        self.level = ProductLevel::RAW;
        self.quality = QualityReport::default();
        info!(rows = self.data.height(), "dataset reset to raw snapshot");
        Ok(())
    }

    /// Drops the raw snapshot. [`reset_dataset`](Self::reset_dataset) fails afterwards.
    pub fn reduce_memory(&mut self) {
        if self.raw.take().is_some() {
            info!("raw snapshot discarded");
        }
    }

    pub(crate) fn replace_data(&mut self, data: DataFrame) {
        self.data = data;
    }

    pub(crate) fn set_level(&mut self, level: ProductLevel) {
        self.level = level;
    }

    pub(crate) fn record(&mut self, operation: Operation) {
        self.ledger.record(operation);
    }

    pub(crate) fn forget(&mut self, operation: Operation) {
        self.ledger.forget(operation);
    }

    pub(crate) fn report(&mut self, issues: impl IntoIterator<Item = DataQualityIssue>) {
        self.quality.extend(issues);
    }

    /// Fails unless the dataset covers the full source range or `force` is set.
    pub(crate) fn ensure_complete(&self, operation: Operation, force: bool) -> Result<()> {
        if self.complete || force {
            return Ok(());
        }
        Err(TransformError::IncompleteDataset {
            operation: operation.name(),
            loaded: self.years.len(),
            expected: usize::try_from(SOURCE_LAST_YEAR - SOURCE_FIRST_YEAR + 1).unwrap_or(0),
        })
    }
}

/// Loads the requested years and wraps them as a fresh dataset.
pub fn load_dataset(
    config: &SourceConfig,
    years: impl IntoIterator<Item = i32>,
    policy: LoadPolicy,
) -> Result<TradeDataset, LoadError> {
    let loaded = load_years(config, years, policy)?;
    let dataset = TradeDataset::new(loaded.frame, loaded.years);
    info!(
        rows = dataset.height(),
        years = dataset.years().len(),
        complete = dataset.is_complete(),
        "dataset loaded"
    );
    Ok(dataset)
}
