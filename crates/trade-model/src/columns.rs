//! Column names of the working trade table.
//!
//! The raw interface columns follow the NBER-Feenstra file layout. Enrichment
//! columns are added by the transformation engine and are prefixed with `i`
//! (importer) or `e` (exporter).

pub const YEAR: &str = "year";
pub const IMPORTER_CODE: &str = "icode";
pub const IMPORTER_NAME: &str = "importer";
pub const EXPORTER_CODE: &str = "ecode";
pub const EXPORTER_NAME: &str = "exporter";
/// Product code at the dataset's current level.
pub const PRODUCT_CODE: &str = "sitc";
pub const UNIT: &str = "unit";
/// Direction-of-trade flag.
pub const DIRECTION: &str = "dot";
pub const VALUE: &str = "value";
pub const QUANTITY: &str = "quantity";

/// Name of the product column in raw source files.
pub const SOURCE_PRODUCT_CODE: &str = "sitc4";

pub const IMPORTER_REGION: &str = "iregion";
pub const IMPORTER_ISO3N: &str = "iiso3n";
pub const IMPORTER_MODIFIER: &str = "imod";
pub const EXPORTER_REGION: &str = "eregion";
pub const EXPORTER_ISO3N: &str = "eiso3n";
pub const EXPORTER_MODIFIER: &str = "emod";

pub const IMPORTER_ISO3C: &str = "iiso3c";
pub const EXPORTER_ISO3C: &str = "eiso3c";
pub const IMPORTER_COUNTRY: &str = "icountry";
pub const EXPORTER_COUNTRY: &str = "ecountry";

/// Official SITC revision 2 flag.
pub const OFFICIAL: &str = "official";

/// Raw interface columns in file order.
pub const RAW_COLUMNS: [&str; 10] = [
    YEAR,
    IMPORTER_CODE,
    IMPORTER_NAME,
    EXPORTER_CODE,
    EXPORTER_NAME,
    PRODUCT_CODE,
    UNIT,
    DIRECTION,
    VALUE,
    QUANTITY,
];

/// Key shared by original and adjustment tables in an adjustment merge.
pub const ADJUSTMENT_KEY: [&str; 6] = [
    YEAR,
    IMPORTER_CODE,
    EXPORTER_CODE,
    PRODUCT_CODE,
    UNIT,
    DIRECTION,
];

/// Sentinel written into standardized code columns when a lookup misses.
pub const UNMATCHED: &str = ".";

/// ISO3 alpha code used for the "world" aggregate partner.
pub const WORLD: &str = "WLD";
