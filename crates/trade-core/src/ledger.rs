//! Ordered record of the operations applied to a dataset.

use std::fmt;

use serde::{Deserialize, Serialize};
use trade_model::Operation;

/// Append-only list of applied operation names.
///
/// Each dataset owns its ledger; recording an operation twice keeps the
/// first entry only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLedger {
    entries: Vec<String>,
}

impl OperationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_run(&self, operation: Operation) -> bool {
        self.has_run_named(&operation.name())
    }

    pub fn has_run_named(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    pub fn record(&mut self, operation: Operation) {
        let name = operation.name();
        if !self.has_run_named(&name) {
            self.entries.push(name);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes `operation` so it can run again on changed data.
    pub(crate) fn forget(&mut self, operation: Operation) {
        let name = operation.name();
        self.entries.retain(|entry| *entry != name);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for OperationLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "(empty)");
        }
        write!(f, "{}", self.entries.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_model::{ProductLevel, TradeSide};

    #[test]
    fn record_is_idempotent() {
        let mut ledger = OperationLedger::new();
        ledger.record(Operation::SplitCountryCode);
        ledger.record(Operation::AddIso3Code);
        ledger.record(Operation::SplitCountryCode);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.has_run(Operation::AddIso3Code));
        assert!(!ledger.has_run(Operation::CountriesOnly));
        assert_eq!(ledger.to_string(), "split_country_code -> add_iso3_code");
    }

    #[test]
    fn parameterized_entries() {
        let mut ledger = OperationLedger::new();
        ledger.record(Operation::CountrySideOnly(TradeSide::Importer));
        ledger.record(Operation::CollapseToProductLevel(ProductLevel::new(3).unwrap()));
        assert!(ledger.has_run(Operation::CountrySideOnly(TradeSide::Importer)));
        assert!(!ledger.has_run(Operation::CountrySideOnly(TradeSide::Exporter)));
        assert!(ledger.has_run_named("collapse_to_product_level[3]"));
    }

    #[test]
    fn forget_keeps_remaining_order() {
        let mut ledger = OperationLedger::new();
        ledger.record(Operation::SplitCountryCode);
        ledger.record(Operation::AddIso3Code);
        ledger.record(Operation::WorldOnly);
        ledger.forget(Operation::AddIso3Code);
        ledger.forget(Operation::CountriesOnly);
        assert_eq!(ledger.to_string(), "split_country_code -> world_only");
        ledger.record(Operation::AddIso3Code);
        assert_eq!(ledger.entries().last().map(String::as_str), Some("add_iso3_code"));
    }

    #[test]
    fn empty_ledger_display_and_serde() {
        let ledger = OperationLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.to_string(), "(empty)");
        let mut ledger = ledger;
        ledger.record(Operation::WorldOnly);
        let json = serde_json::to_string(&ledger).unwrap();
        let back: OperationLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
