//! Named transformation operations recorded in a dataset's ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{ProductLevel, TradeSide};

/// A transformation of the working dataset.
///
/// The ledger stores the rendered [`Operation::name`], so parameterized
/// operations (product level, trade side) are tracked per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    SplitCountryCode,
    AddIso3Code,
    AddCountryName,
    CountriesOnly,
    WorldOnly,
    CountrySideOnly(TradeSide),
    MergeAdjustmentData,
    CollapseToValuesOnly,
    CollapseToProductLevel(ProductLevel),
    MarkOfficialCodes,
    DropAlphaCodes,
    DropNonOfficialCodes,
    RecodeIntertemporalCountry,
    DropIncompleteCountries,
}

impl Operation {
    pub fn name(&self) -> String {
        match self {
            Operation::SplitCountryCode => "split_country_code".to_string(),
            Operation::AddIso3Code => "add_iso3_code".to_string(),
            Operation::AddCountryName => "add_country_name".to_string(),
            Operation::CountriesOnly => "countries_only".to_string(),
            Operation::WorldOnly => "world_only".to_string(),
            Operation::CountrySideOnly(side) => format!("country_side_only[{side}]"),
            Operation::MergeAdjustmentData => "merge_adjustment_data".to_string(),
            Operation::CollapseToValuesOnly => "collapse_to_values_only".to_string(),
            Operation::CollapseToProductLevel(level) => {
                format!("collapse_to_product_level[{}]", level.digits())
            }
            Operation::MarkOfficialCodes => "mark_official_codes".to_string(),
            Operation::DropAlphaCodes => "drop_alpha_codes".to_string(),
            Operation::DropNonOfficialCodes => "drop_non_official_codes".to_string(),
            Operation::RecodeIntertemporalCountry => "recode_intertemporal_country".to_string(),
            Operation::DropIncompleteCountries => "drop_incomplete_countries".to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
