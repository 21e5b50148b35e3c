//! Type-safe enumerations for dataset construction.
//!
//! These enums replace the stringly-typed selectors of the construction
//! recipes (`"trade"`, `"export"`, `"import"`, product levels, trade sides).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::columns;
use crate::error::ModelError;

/// Which side(s) of the bilateral pair survive aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Keep both exporter and importer.
    Trade,
    /// Keep the exporter only; importers are summed out.
    Export,
    /// Keep the importer only; exporters are summed out.
    Import,
}

impl DataType {
    pub const ALL: [DataType; 3] = [DataType::Trade, DataType::Export, DataType::Import];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Trade => "trade",
            DataType::Export => "export",
            DataType::Import => "import",
        }
    }

    /// Country code columns kept by this data type, in output order.
    pub fn country_columns(&self) -> &'static [&'static str] {
        match self {
            DataType::Trade => &[columns::EXPORTER_ISO3C, columns::IMPORTER_ISO3C],
            DataType::Export => &[columns::EXPORTER_ISO3C],
            DataType::Import => &[columns::IMPORTER_ISO3C],
        }
    }

    /// The side whose country identity must be a real country, if only one.
    pub fn reporting_side(&self) -> Option<TradeSide> {
        match self {
            DataType::Trade => None,
            DataType::Export => Some(TradeSide::Exporter),
            DataType::Import => Some(TradeSide::Importer),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trade" => Ok(DataType::Trade),
            "export" | "exports" => Ok(DataType::Export),
            "import" | "imports" => Ok(DataType::Import),
            other => Err(ModelError::UnknownDataType(other.to_string())),
        }
    }
}

/// One side of a bilateral trade flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Exporter,
    Importer,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Exporter => "exporter",
            TradeSide::Importer => "importer",
        }
    }

    pub fn other(&self) -> TradeSide {
        match self {
            TradeSide::Exporter => TradeSide::Importer,
            TradeSide::Importer => TradeSide::Exporter,
        }
    }

    /// Raw composite code column for this side.
    pub fn code_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_CODE,
            TradeSide::Importer => columns::IMPORTER_CODE,
        }
    }

    pub fn region_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_REGION,
            TradeSide::Importer => columns::IMPORTER_REGION,
        }
    }

    pub fn iso3n_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_ISO3N,
            TradeSide::Importer => columns::IMPORTER_ISO3N,
        }
    }

    pub fn modifier_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_MODIFIER,
            TradeSide::Importer => columns::IMPORTER_MODIFIER,
        }
    }

    pub fn iso3c_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_ISO3C,
            TradeSide::Importer => columns::IMPORTER_ISO3C,
        }
    }

    pub fn country_column(&self) -> &'static str {
        match self {
            TradeSide::Exporter => columns::EXPORTER_COUNTRY,
            TradeSide::Importer => columns::IMPORTER_COUNTRY,
        }
    }

    /// Columns describing this side's reported identity. They go stale once
    /// the side's alpha code is recoded.
    pub fn identity_columns(&self) -> [&'static str; 6] {
        match self {
            TradeSide::Exporter => [
                columns::EXPORTER_CODE,
                columns::EXPORTER_NAME,
                columns::EXPORTER_REGION,
                columns::EXPORTER_ISO3N,
                columns::EXPORTER_MODIFIER,
                columns::EXPORTER_COUNTRY,
            ],
            TradeSide::Importer => [
                columns::IMPORTER_CODE,
                columns::IMPORTER_NAME,
                columns::IMPORTER_REGION,
                columns::IMPORTER_ISO3N,
                columns::IMPORTER_MODIFIER,
                columns::IMPORTER_COUNTRY,
            ],
        }
    }

    pub const BOTH: [TradeSide; 2] = [TradeSide::Exporter, TradeSide::Importer];
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product code granularity, from SITC section (1 digit) to subgroup (4 digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ProductLevel(u8);

impl ProductLevel {
    /// Granularity of raw source data.
    pub const RAW: ProductLevel = ProductLevel(4);

    pub fn new(digits: u8) -> Result<Self, ModelError> {
        if (1..=4).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(ModelError::InvalidProductLevel(digits))
        }
    }

    pub fn digits(&self) -> u8 {
        self.0
    }

    /// Output column name for product codes at this level (e.g. `sitc3`).
    pub fn column_name(&self) -> String {
        format!("sitc{}", self.0)
    }
}

impl Default for ProductLevel {
    fn default() -> Self {
        Self::RAW
    }
}

impl TryFrom<u8> for ProductLevel {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductLevel> for u8 {
    fn from(level: ProductLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ProductLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_parses_case_insensitively() {
        assert_eq!("Trade".parse::<DataType>().unwrap(), DataType::Trade);
        assert_eq!(" exports ".parse::<DataType>().unwrap(), DataType::Export);
        assert!("flows".parse::<DataType>().is_err());
    }

    #[test]
    fn product_level_bounds() {
        assert!(ProductLevel::new(0).is_err());
        assert!(ProductLevel::new(5).is_err());
        assert_eq!(ProductLevel::new(3).unwrap().column_name(), "sitc3");
        assert_eq!(ProductLevel::default(), ProductLevel::RAW);
    }

    #[test]
    fn trade_side_columns() {
        assert_eq!(TradeSide::Exporter.iso3c_column(), "eiso3c");
        assert_eq!(TradeSide::Importer.other(), TradeSide::Exporter);
    }
}
