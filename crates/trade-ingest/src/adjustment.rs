use std::path::Path;

use polars::prelude::*;
use tracing::info;

use trade_model::columns;

use crate::csv_table::TypedCsv;
use crate::error::LoadError;

/// Loads a correction table for merging into raw data.
///
/// The table carries the adjustment key (`year`, `icode`, `ecode`, `sitc`,
/// `unit`, `dot`) and `value`; `quantity` is kept only when the file has it.
pub fn load_adjustment_table(path: &Path) -> Result<DataFrame, LoadError> {
    let table = TypedCsv::read(path)?;
    let mut frame_columns = vec![
        Series::new(columns::YEAR.into(), table.years(columns::YEAR)?).into_column(),
        Series::new(
            columns::IMPORTER_CODE.into(),
            table.strings(columns::IMPORTER_CODE)?,
        )
        .into_column(),
        Series::new(
            columns::EXPORTER_CODE.into(),
            table.strings(columns::EXPORTER_CODE)?,
        )
        .into_column(),
        Series::new(
            columns::PRODUCT_CODE.into(),
            table.strings(columns::PRODUCT_CODE)?,
        )
        .into_column(),
        Series::new(columns::UNIT.into(), table.optional_strings(columns::UNIT)).into_column(),
        Series::new(
            columns::DIRECTION.into(),
            table.optional_strings(columns::DIRECTION),
        )
        .into_column(),
        Series::new(columns::VALUE.into(), table.numbers(columns::VALUE)?).into_column(),
    ];
    if table.position(columns::QUANTITY).is_some() {
        frame_columns.push(
            Series::new(
                columns::QUANTITY.into(),
                table.optional_numbers(columns::QUANTITY)?,
            )
            .into_column(),
        );
    }
    let frame = DataFrame::new(frame_columns)?;
    info!(path = %path.display(), rows = frame.height(), "loaded adjustment table");
    Ok(frame)
}
