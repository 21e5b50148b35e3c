//! Columnar year cache.
//!
//! One parquet file per source year. The cache holds exactly the raw
//! interface frame, so a cache hit and a source parse are interchangeable.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use trade_model::columns::RAW_COLUMNS;

use crate::error::LoadError;

pub fn read_cached_year(path: &Path, year: i32) -> Result<DataFrame, LoadError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::CacheMiss {
                year,
                path: path.to_path_buf(),
            }
        } else {
            LoadError::io(path, e)
        }
    })?;
    let frame = ParquetReader::new(file).finish()?;
    for column in RAW_COLUMNS {
        if frame.column(column).is_err() {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    let frame = frame.select(RAW_COLUMNS)?;
    debug!(path = %path.display(), rows = frame.height(), "read cached year");
    Ok(frame)
}

pub fn write_cached_year(path: &Path, frame: &DataFrame) -> Result<(), LoadError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| LoadError::io(parent, e))?;
    }
    let mut file = File::create(path).map_err(|e| LoadError::io(path, e))?;
    let mut frame = frame.clone();
    ParquetWriter::new(&mut file).finish(&mut frame)?;
    debug!(path = %path.display(), rows = frame.height(), "wrote cached year");
    Ok(())
}
