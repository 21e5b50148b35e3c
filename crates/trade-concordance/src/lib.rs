#![deny(unsafe_code)]

pub mod concordance;
pub mod csv;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod paths;

pub use crate::concordance::{
    CodeConcordance, CodeConcordanceBuilder, CodeSpace, ReferenceSummary, Translation,
};
pub use crate::error::ConcordanceError;
pub use crate::paths::{REFERENCE_ENV_VAR, reference_root};
pub use trade_model::{CompositeCountryCode, MalformedCodeError};
