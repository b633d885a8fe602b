//! The ledger store: the single owner of the ordered record collection.

use crate::error::{Error, Result};
use crate::model::{Money, Record};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Owns the ordered collection of daily records and enforces the
/// one-record-per-date rule.
///
/// Every mutation ends with a full recompute of the running-balance column.
/// The recompute is deliberately whole-collection rather than incremental:
/// it stays correct under edits and deletes at arbitrary positions, and the
/// collection is small (daily cadence), so O(n) per mutation is fine.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, e.g. after loading a persisted blob.
    /// Stored running balances are not trusted; they are recomputed here.
    pub fn restore(records: Vec<Record>) -> Self {
        let mut ledger = Self { records };
        ledger.recompute_running_balance();
        ledger
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An ordered read-only copy, safe for presentation and export to
    /// consume without affecting store state.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// True when a record with this non-empty date is already present.
    pub fn contains_date(&self, date: &str) -> bool {
        self.records.iter().any(|r| r.keyed_by(date))
    }

    /// Append a record. Fails without mutating anything when a record with
    /// the same non-empty date already exists.
    pub fn add(&mut self, record: Record) -> Result<()> {
        if !record.date.is_empty() && self.contains_date(&record.date) {
            return Err(Error::DuplicateDate(record.date));
        }
        self.records.push(record);
        self.recompute_running_balance();
        Ok(())
    }

    /// Replace the record at `index` wholesale. A date change that collides
    /// with a different existing record is rejected, so an edit cannot
    /// create the duplicate state that `add` guards against.
    pub fn update(&mut self, index: usize, record: Record) -> Result<()> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        if !record.date.is_empty() {
            let collision = self
                .records
                .iter()
                .enumerate()
                .any(|(ix, r)| ix != index && r.keyed_by(&record.date));
            if collision {
                return Err(Error::DuplicateDate(record.date));
            }
        }
        self.records[index] = record;
        self.recompute_running_balance();
        Ok(())
    }

    /// Delete the record at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Record> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        self.recompute_running_balance();
        Ok(removed)
    }

    /// Empty the collection. Irreversible.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append a whole batch, then recompute once. The batch has already been
    /// screened by the importer, so duplicate checking is not repeated here;
    /// see `reconcile`.
    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
        self.recompute_running_balance();
    }

    /// One pass over the collection in store order, accumulator from zero,
    /// assigning each record's cumulative profit.
    fn recompute_running_balance(&mut self) {
        let mut total = Money::ZERO;
        for record in &mut self.records {
            total += record.profit;
            record.running_balance = total;
        }
        debug!(
            entries = self.records.len(),
            balance = %total,
            "recomputed running balances"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test::record;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[track_caller]
    fn assert_running_balance_invariant(ledger: &Ledger) {
        let mut total = Money::ZERO;
        for (ix, r) in ledger.records().iter().enumerate() {
            total += r.profit;
            assert_eq!(
                r.running_balance, total,
                "running balance wrong at position {ix}"
            );
        }
    }

    #[test]
    fn test_add_assigns_running_balance() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0")).unwrap();
        assert_eq!(ledger.records()[0].running_balance, money("15.00"));
        assert_eq!(ledger.records()[1].running_balance, money("30.00"));
        assert_running_balance_invariant(&ledger);
    }

    #[test]
    fn test_duplicate_date_rejected_and_state_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        let before = ledger.snapshot();
        let err = ledger
            .add(record("2024-01-01", 1, 1, "1.00", "0"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateDate(d) if d == "2024-01-01"));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_empty_dates_are_exempt_from_uniqueness() {
        let mut ledger = Ledger::new();
        ledger.add(record("", 1, 0, "1.00", "0")).unwrap();
        ledger.add(record("", 2, 0, "1.00", "0")).unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_update_replaces_wholesale_and_recomputes() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0")).unwrap();
        ledger
            .update(0, record("2024-01-01", 10, 10, "2.00", "0"))
            .unwrap();
        assert_eq!(ledger.records()[0].profit, money("20.00"));
        assert_eq!(ledger.records()[1].running_balance, money("35.00"));
        assert_running_balance_invariant(&ledger);
    }

    #[test]
    fn test_update_bad_index() {
        let mut ledger = Ledger::new();
        let err = ledger
            .update(0, record("2024-01-01", 1, 1, "1.00", "0"))
            .unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn test_update_rejects_date_collision_with_other_entry() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0")).unwrap();
        let err = ledger
            .update(1, record("2024-01-01", 5, 5, "3.00", "0"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateDate(_)));
        // Re-submitting the same date at the same index is fine.
        ledger
            .update(1, record("2024-01-02", 6, 6, "3.00", "0"))
            .unwrap();
    }

    #[test]
    fn test_remove_recomputes() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0")).unwrap();
        ledger.add(record("2024-01-03", 2, 2, "5.00", "0")).unwrap();
        let removed = ledger.remove(1).unwrap();
        assert_eq!(removed.date, "2024-01-02");
        assert_eq!(ledger.len(), 2);
        assert_running_balance_invariant(&ledger);
        assert!(matches!(
            ledger.remove(5).unwrap_err(),
            Error::IndexOutOfRange { index: 5, len: 2 }
        ));
    }

    #[test]
    fn test_invariant_holds_across_mixed_mutations() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0.25")).unwrap();
        ledger.add(record("2024-01-03", 7, 2, "1.50", "4.00")).unwrap();
        ledger.remove(0).unwrap();
        ledger
            .update(0, record("2024-01-02", 5, 4, "3.00", "0.25"))
            .unwrap();
        ledger.add(record("2024-01-04", 1, 1, "9.99", "0")).unwrap();
        assert_running_balance_invariant(&ledger);
    }

    #[test]
    fn test_restore_recomputes_stored_balances() {
        let mut tampered = record("2024-01-01", 10, 8, "2.00", "1.00");
        tampered.running_balance = money("999.00");
        let ledger = Ledger::restore(vec![tampered]);
        assert_eq!(ledger.records()[0].running_balance, money("15.00"));
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
