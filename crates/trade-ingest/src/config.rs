//! Source locations and load policy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the loader chooses between source files and the year cache.
///
/// There is no implicit fallback chain: the caller picks one behaviour and
/// every cache miss is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Parse source files; never read or write the cache.
    SourceOnly,
    /// Read cached frames only; a missing year is an error.
    CacheOnly,
    /// Read the cache when present, otherwise parse the source and cache it.
    /// `rebuild_cache` always parses the source and overwrites the cache.
    CacheOrSource { rebuild_cache: bool },
}

impl Default for LoadPolicy {
    fn default() -> Self {
        LoadPolicy::CacheOrSource {
            rebuild_cache: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding `wtf{yy}.csv` files.
    pub source_dir: PathBuf,
    /// Directory holding `wtf{yyyy}.parquet` files.
    pub cache_dir: PathBuf,
}

impl SourceConfig {
    /// Cache defaults to `cache/` inside the source directory.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let cache_dir = source_dir.join("cache");
        Self {
            source_dir,
            cache_dir,
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Source file for `year`, named with the two-digit year (`wtf62.csv`).
    pub fn source_file(&self, year: i32) -> PathBuf {
        self.source_dir
            .join(format!("wtf{:02}.csv", year.rem_euclid(100)))
    }

    pub fn cache_file(&self, year: i32) -> PathBuf {
        self.cache_dir.join(format!("wtf{year}.parquet"))
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_year_layout() {
        let config = SourceConfig::new("/data/wtf");
        assert_eq!(config.source_file(1962), PathBuf::from("/data/wtf/wtf62.csv"));
        assert_eq!(config.source_file(2000), PathBuf::from("/data/wtf/wtf00.csv"));
        assert_eq!(
            config.cache_file(1962),
            PathBuf::from("/data/wtf/cache/wtf1962.parquet")
        );
        let moved = config.with_cache_dir("/tmp/cache");
        assert_eq!(moved.cache_file(2000), PathBuf::from("/tmp/cache/wtf2000.parquet"));
    }

    #[test]
    fn default_policy_uses_cache() {
        assert_eq!(
            LoadPolicy::default(),
            LoadPolicy::CacheOrSource {
                rebuild_cache: false
            }
        );
    }
}
