use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use trade_common::column_i32s;
use trade_model::columns;

use crate::csv_table::{TypedCsv, raw_frame};
use crate::error::LoadError;

/// Parses one yearly source file into the raw interface frame.
///
/// Every row must carry the file's year; a foreign year is reported as an
/// invalid value rather than silently merged into the wrong year.
pub fn read_source_year(path: &Path, year: i32) -> Result<DataFrame, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingSource {
            year,
            path: path.to_path_buf(),
        });
    }
    let table = TypedCsv::read(path)?;
    let frame = raw_frame(&table)?;

    let years = column_i32s(&frame, columns::YEAR)?;
    if let Some(found) = years.iter().flatten().find(|found| **found != year) {
        warn!(path = %path.display(), expected = year, found, "source file holds a foreign year");
        return Err(LoadError::InvalidValue {
            path: path.to_path_buf(),
            line: 0,
            column: columns::YEAR.to_string(),
            value: found.to_string(),
        });
    }
    debug!(path = %path.display(), rows = frame.height(), "parsed source file");
    Ok(frame)
}
