use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A code lookup returned the missing sentinel.
    UnmatchedCode,
    /// A composite country code could not be decoded.
    MalformedCode,
    /// A row was dropped because its country has no intertemporal recode.
    UnrecodedCountry,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::UnmatchedCode => "unmatched_code",
            IssueKind::MalformedCode => "malformed_code",
            IssueKind::UnrecodedCountry => "unrecoded_country",
        }
    }
}

/// A non-fatal, row-level data quality finding.
///
/// Issues are aggregated per distinct offending value; `rows` counts how many
/// rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityIssue {
    pub kind: IssueKind,
    /// Column the value was read from.
    pub column: String,
    /// The offending value.
    pub value: String,
    /// Number of rows affected.
    pub rows: usize,
    /// Operation that reported the issue.
    pub operation: String,
}

/// Collected data quality issues for one dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub issues: Vec<DataQualityIssue>,
}

impl QualityReport {
    pub fn push(&mut self, issue: DataQualityIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = DataQualityIssue>) {
        self.issues.extend(issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// Total affected rows across all issues of `kind`.
    pub fn rows_of(&self, kind: IssueKind) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.kind == kind)
            .map(|issue| issue.rows)
            .sum()
    }
}
