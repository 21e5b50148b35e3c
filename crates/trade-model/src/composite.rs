//! Composite country codes of the raw source files.
//!
//! A raw code packs three fields into six digits: a two-digit region, the
//! three-digit numeric country code and a one-digit modifier. For example
//! `218420` is region `21`, country `842` (United States), modifier `0`.

use std::fmt;

use crate::error::MalformedCodeError;

/// Length of a composite country code in the source files.
pub const COMPOSITE_CODE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeCountryCode<'a> {
    pub region: &'a str,
    pub numeric: &'a str,
    pub modifier: &'a str,
}

impl<'a> CompositeCountryCode<'a> {
    pub fn parse(code: &'a str) -> Result<Self, MalformedCodeError> {
        if code.len() != COMPOSITE_CODE_LEN {
            return Err(MalformedCodeError {
                code: code.to_string(),
                reason: "expected exactly 6 characters",
            });
        }
        if !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MalformedCodeError {
                code: code.to_string(),
                reason: "expected ASCII digits only",
            });
        }
        Ok(Self {
            region: &code[0..2],
            numeric: &code[2..5],
            modifier: &code[5..6],
        })
    }
}

impl fmt::Display for CompositeCountryCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.region, self.numeric, self.modifier)
    }
}
