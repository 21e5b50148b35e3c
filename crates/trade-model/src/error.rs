use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown data type: {0} (expected trade, export or import)")]
    UnknownDataType(String),
    #[error("invalid product level {0} (expected 1 to 4 digits)")]
    InvalidProductLevel(u8),
}

/// A raw country code that is not exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed composite country code '{code}': {reason}")]
pub struct MalformedCodeError {
    pub code: String,
    pub reason: &'static str,
}
