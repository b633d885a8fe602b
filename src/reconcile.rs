//! Merging an import batch into the ledger.

use crate::import::ImportBatch;
use crate::ledger::Ledger;
use serde::Serialize;
use tracing::info;

/// What happened to a batch: how many rows were appended and how many were
/// rejected along the way. An all-rejected batch is still an `Ok` outcome;
/// only payload and header failures are errors, so callers can tell
/// "nothing new to import" from "could not understand the file".
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReconcileReport {
    pub accepted: usize,
    pub rejected: usize,
}

impl ReconcileReport {
    /// True when the batch contributed nothing to the ledger.
    pub fn is_noop(&self) -> bool {
        self.accepted == 0
    }
}

/// Append every accepted candidate to the ledger in one batch, then let the
/// store recompute running balances once. One recompute per batch, not per
/// row, so a half-applied running-balance column is never observable.
pub fn reconcile(ledger: &mut Ledger, batch: ImportBatch) -> ReconcileReport {
    let report = ReconcileReport {
        accepted: batch.accepted.len(),
        rejected: batch.rejected(),
    };
    if !batch.accepted.is_empty() {
        ledger.extend(batch.accepted);
    }
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        "reconciled import batch"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Money;
    use crate::test::record;
    use std::str::FromStr;

    #[test]
    fn test_reconcile_appends_and_recomputes_once() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();

        let batch = ImportBatch {
            accepted: vec![
                record("2024-01-02", 5, 5, "3.00", "0"),
                record("2024-01-03", 2, 2, "1.00", "0"),
            ],
            skipped: 1,
            duplicates: 2,
        };
        let report = reconcile(&mut ledger, batch);
        assert_eq!(report, ReconcileReport { accepted: 2, rejected: 3 });
        assert!(!report.is_noop());
        assert_eq!(ledger.len(), 3);
        assert_eq!(
            ledger.records()[2].running_balance,
            Money::from_str("32.00").unwrap()
        );
    }

    #[test]
    fn test_empty_batch_is_a_noop_not_an_error() {
        let mut ledger = Ledger::new();
        let report = reconcile(&mut ledger, ImportBatch::default());
        assert!(report.is_noop());
        assert!(ledger.is_empty());
    }
}
