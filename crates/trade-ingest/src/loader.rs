use std::collections::BTreeSet;

use polars::prelude::*;
use tracing::{info, warn};

use trade_model::source_years;

use crate::cache::{read_cached_year, write_cached_year};
use crate::config::{LoadPolicy, SourceConfig};
use crate::error::LoadError;
use crate::source::read_source_year;

/// Raw frames for a set of years, stacked in ascending year order.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub frame: DataFrame,
    pub years: BTreeSet<i32>,
}

/// Loads the requested years under `policy`.
pub fn load_years(
    config: &SourceConfig,
    years: impl IntoIterator<Item = i32>,
    policy: LoadPolicy,
) -> Result<LoadedSource, LoadError> {
    let years: BTreeSet<i32> = years.into_iter().collect();
    if years.is_empty() {
        return Err(LoadError::NoYears);
    }
    if let Some(year) = years.iter().find(|year| !source_years().contains(*year)) {
        return Err(LoadError::UnknownYear(*year));
    }

    let mut stacked: Option<DataFrame> = None;
    for &year in &years {
        let frame = load_year(config, year, policy)?;
        info!(year, rows = frame.height(), "loaded year");
        match stacked.as_mut() {
            Some(existing) => {
                existing.vstack_mut(&frame)?;
            }
            None => stacked = Some(frame),
        }
    }
    let frame = stacked.ok_or(LoadError::NoYears)?;
    Ok(LoadedSource { frame, years })
}

fn load_year(config: &SourceConfig, year: i32, policy: LoadPolicy) -> Result<DataFrame, LoadError> {
    let cache_path = config.cache_file(year);
    match policy {
        LoadPolicy::SourceOnly => read_source_year(&config.source_file(year), year),
        LoadPolicy::CacheOnly => read_cached_year(&cache_path, year),
        LoadPolicy::CacheOrSource { rebuild_cache } => {
            if !rebuild_cache {
                match read_cached_year(&cache_path, year) {
                    Ok(frame) => return Ok(frame),
                    Err(LoadError::CacheMiss { .. }) => {
                        warn!(year, path = %cache_path.display(), "cache miss, parsing source");
                    }
                    Err(err) => return Err(err),
                }
            }
            let frame = read_source_year(&config.source_file(year), year)?;
            write_cached_year(&cache_path, &frame)?;
            Ok(frame)
        }
    }
}
