//! CSV output.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::tables::OutputData;

/// File name for a recipe's table, e.g. `SC_CNTRY_SR2L3_Y62to00_A_trade.csv`.
pub fn output_file_name(recipe: &str, data: &OutputData) -> String {
    format!("{recipe}_{}.csv", data.data_type())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes the table with a header row, creating parent directories.
pub fn write_csv(path: &Path, data: &OutputData) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut frame = data.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)?;
    info!(
        path = %path.display(),
        data_type = %data.data_type(),
        rows = frame.height(),
        "output written"
    );
    Ok(())
}

/// Writes into `dir` under [`output_file_name`] and returns the path.
pub fn write_output(dir: &Path, recipe: &str, data: &OutputData) -> Result<PathBuf> {
    let path = dir.join(output_file_name(recipe, data));
    write_csv(&path, data)?;
    Ok(path)
}
