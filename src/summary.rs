//! Cross-record totals, computed fresh from a snapshot on every call.

use crate::model::{Money, Record};
use serde::Serialize;

/// Totals over the current record set. A pure function of the slice it is
/// given; nothing is cached across mutations.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub collected: u64,
    pub sold: u64,
    pub profit: Money,
    pub expense: Money,
}

impl Summary {
    pub fn of(records: &[Record]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.collected += u64::from(record.collected);
            summary.sold += u64::from(record.sold);
            summary.profit += record.profit;
            summary.expense += record.expense_amount;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::test::record;
    use std::str::FromStr;

    #[test]
    fn test_empty() {
        let s = Summary::of(&[]);
        assert_eq!(s, Summary::default());
    }

    #[test]
    fn test_two_day_scenario() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0.00")).unwrap();

        let s = Summary::of(ledger.records());
        assert_eq!(s.collected, 15);
        assert_eq!(s.sold, 13);
        assert_eq!(s.profit, Money::from_str("30.00").unwrap());
        assert_eq!(s.expense, Money::from_str("1.00").unwrap());
        assert_eq!(
            ledger.records()[1].running_balance,
            Money::from_str("30.00").unwrap()
        );
    }

    #[test]
    fn test_matches_direct_summation_after_mutations() {
        let mut ledger = Ledger::new();
        ledger.add(record("2024-01-01", 10, 8, "2.00", "1.00")).unwrap();
        ledger.add(record("2024-01-02", 5, 5, "3.00", "0.50")).unwrap();
        ledger.remove(0).unwrap();

        let s = Summary::of(ledger.records());
        let direct: Money = ledger.records().iter().map(|r| r.profit).sum();
        assert_eq!(s.profit, direct);
        assert_eq!(s.collected, 5);
    }
}
