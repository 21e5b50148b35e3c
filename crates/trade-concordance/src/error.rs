#![deny(unsafe_code)]

use std::path::PathBuf;

/// Failure to build a concordance from its static reference tables.
///
/// Every variant is a configuration problem: the reference data is absent,
/// malformed, or does not match its manifest. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum ConcordanceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing reference table for role: {role}")]
    MissingTable { role: String },

    #[error("reference table listed in manifest does not exist: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("malformed reference table {table}: {message}")]
    MalformedTable { table: String, message: String },
}

impl ConcordanceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTable {
            table: table.into(),
            message: message.into(),
        }
    }
}
