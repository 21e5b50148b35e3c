use polars::prelude::*;

use trade_common::column_strings;
use trade_concordance::CodeConcordance;
use trade_model::{Operation, columns};

use super::{already_ran, log_applied};
use crate::dataset::TradeDataset;
use crate::error::Result;
use crate::frame_utils::require_column;

/// Adds the `official` flag: whether the product code at the dataset's
/// current level is in the official SITC revision 2 list. Returns the
/// number of non-official rows.
pub fn mark_official_codes(
    dataset: &mut TradeDataset,
    concordance: &CodeConcordance,
) -> Result<usize> {
    let operation = Operation::MarkOfficialCodes;
    if already_ran(dataset, operation) {
        return Ok(0);
    }
    let mut df = dataset.data().clone();
    let flags = official_flags(&df, &operation.name(), concordance)?;
    let non_official = flags.iter().filter(|flag| !**flag).count();
    df.with_column(Series::new(columns::OFFICIAL.into(), flags))?;
    dataset.replace_data(df);
    dataset.record(operation);
    log_applied(operation, non_official, dataset.height());
    Ok(non_official)
}

pub(crate) fn official_flags(
    df: &DataFrame,
    operation: &str,
    concordance: &CodeConcordance,
) -> Result<Vec<bool>> {
    require_column(df, operation, columns::PRODUCT_CODE)?;
    Ok(column_strings(df, columns::PRODUCT_CODE)?
        .iter()
        .map(|code| concordance.is_official_sitc(code))
        .collect())
}
