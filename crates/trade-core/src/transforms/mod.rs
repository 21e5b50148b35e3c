//! Named, idempotent, dependency-checked transformations.
//!
//! Every function returns the number of rows it affected and records itself
//! in the dataset's ledger. A second call is a no-op returning `0`.

mod codes;
mod collapse;
mod filters;
mod merge;
mod official;
mod recode;

pub use codes::{add_country_name, add_iso3_code, split_country_code};
pub use collapse::{collapse_to_product_level, collapse_to_values_only};
pub use filters::{
    countries_only, country_side_only, drop_alpha_codes, drop_incomplete_countries,
    drop_non_official_codes, world_only,
};
pub use merge::merge_adjustment_data;
pub use official::mark_official_codes;
pub(crate) use official::official_flags;
pub use recode::recode_intertemporal_country;

use tracing::{debug, info};
use trade_model::Operation;

use crate::dataset::{DependencyPolicy, TradeDataset};
use crate::error::{Result, TransformError};

/// Returns true (and logs) when `operation` already ran on the dataset.
fn already_ran(dataset: &TradeDataset, operation: Operation) -> bool {
    let ran = dataset.ledger().has_run(operation);
    if ran {
        debug!(operation = %operation, "already applied, skipping");
    }
    ran
}

/// Makes sure `dependency` has run before `operation`, honouring the
/// dataset's [`DependencyPolicy`].
fn ensure_dependency(
    dataset: &mut TradeDataset,
    operation: Operation,
    dependency: Operation,
    apply: impl FnOnce(&mut TradeDataset) -> Result<usize>,
) -> Result<()> {
    if dataset.ledger().has_run(dependency) {
        return Ok(());
    }
    match dataset.policy() {
        DependencyPolicy::Strict => Err(TransformError::Precondition {
            operation: operation.name(),
            missing: dependency.name(),
        }),
        DependencyPolicy::AutoApply => {
            info!(operation = %operation, dependency = %dependency, "applying missing dependency");
            apply(dataset)?;
            Ok(())
        }
    }
}

fn log_applied(operation: Operation, affected: usize, rows: usize) {
    info!(operation = %operation, affected, rows, "transformation applied");
}
