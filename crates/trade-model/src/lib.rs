pub mod columns;
pub mod composite;
pub mod enums;
pub mod error;
pub mod issue;
pub mod operation;

pub use enums::{DataType, ProductLevel, TradeSide};
pub use composite::CompositeCountryCode;
pub use error::{MalformedCodeError, ModelError};
pub use issue::{DataQualityIssue, IssueKind, QualityReport};
pub use operation::Operation;

/// First year of the NBER-Feenstra World Trade Flows source.
pub const SOURCE_FIRST_YEAR: i32 = 1962;
/// Last year of the NBER-Feenstra World Trade Flows source.
pub const SOURCE_LAST_YEAR: i32 = 2000;

/// The full, contiguous year range of the source.
pub fn source_years() -> std::ops::RangeInclusive<i32> {
    SOURCE_FIRST_YEAR..=SOURCE_LAST_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_report_counts() {
        let mut report = QualityReport::default();
        report.push(DataQualityIssue {
            kind: IssueKind::UnmatchedCode,
            column: "eiso3n".to_string(),
            value: "999".to_string(),
            rows: 3,
            operation: "add_iso3_code".to_string(),
        });
        report.push(DataQualityIssue {
            kind: IssueKind::UnmatchedCode,
            column: "iiso3n".to_string(),
            value: "998".to_string(),
            rows: 2,
            operation: "add_iso3_code".to_string(),
        });
        assert_eq!(report.count_of(IssueKind::UnmatchedCode), 2);
        assert_eq!(report.rows_of(IssueKind::UnmatchedCode), 5);
        assert_eq!(report.count_of(IssueKind::MalformedCode), 0);
    }

    #[test]
    fn data_type_serializes_lowercase() {
        let json = serde_json::to_string(&DataType::Export).expect("serialize data type");
        assert_eq!(json, "\"export\"");
        let level: ProductLevel = serde_json::from_str("3").expect("deserialize level");
        assert_eq!(level.digits(), 3);
        assert!(serde_json::from_str::<ProductLevel>("7").is_err());
    }
}
