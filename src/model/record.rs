//! The daily record: four user-supplied fields plus derived financials.

use crate::model::Money;
use serde::{Deserialize, Serialize};

/// One day of activity: what was collected, what was sold and at what unit
/// price, and the day's aggregated expense.
///
/// The derived fields (`remaining`, `revenue`, `profit`) are computed from
/// the inputs at construction and are never accepted from outside.
/// `running_balance` is cumulative profit in store order; only the ledger
/// assigns it, and it is recomputed for the whole collection on every
/// mutation rather than patched in place.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    /// ISO `YYYY-MM-DD`; the natural key. May be empty for rows whose date
    /// could not be decoded, and empty dates are exempt from uniqueness.
    pub date: String,
    /// Units produced that day.
    pub collected: u32,
    /// Units sold that day.
    pub sold: u32,
    /// Unit sale price.
    pub price: Money,
    /// A single aggregated expense for the day.
    pub expense_amount: Money,
    /// Free text, may be empty.
    pub expense_description: String,
    /// `collected - sold`. Negative is a valid business state, not clamped.
    pub remaining: i64,
    /// `sold * price`.
    pub revenue: Money,
    /// `revenue - expense_amount`.
    pub profit: Money,
    /// Cumulative profit up to and including this record, in store order.
    pub running_balance: Money,
}

impl Record {
    /// Build a record from the four input fields, computing the derived
    /// fields. `running_balance` starts at the record's own profit and is
    /// overwritten by the store's recompute pass.
    pub fn new(
        date: impl Into<String>,
        collected: u32,
        sold: u32,
        price: Money,
        expense_amount: Money,
        expense_description: impl Into<String>,
    ) -> Self {
        let revenue = price * sold;
        let profit = revenue - expense_amount;
        Self {
            date: date.into(),
            collected,
            sold,
            price,
            expense_amount,
            expense_description: expense_description.into(),
            remaining: i64::from(collected) - i64::from(sold),
            revenue,
            profit,
            running_balance: profit,
        }
    }

    /// True when this record's date is non-empty and equal to `date`.
    /// Empty dates never participate in the duplicate-date rule.
    pub fn keyed_by(&self, date: &str) -> bool {
        !self.date.is_empty() && self.date == date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn test_derived_fields() {
        let r = Record::new("2024-01-01", 10, 8, money("2.00"), money("1.00"), "feed");
        assert_eq!(r.remaining, 2);
        assert_eq!(r.revenue, money("16.00"));
        assert_eq!(r.profit, money("15.00"));
    }

    #[test]
    fn test_remaining_may_be_negative() {
        let r = Record::new("2024-01-02", 3, 5, money("1.00"), Money::ZERO, "");
        assert_eq!(r.remaining, -2);
    }

    #[test]
    fn test_profit_may_be_negative() {
        let r = Record::new("2024-01-03", 4, 1, money("0.50"), money("9.00"), "repairs");
        assert_eq!(r.profit, money("-8.50"));
    }

    #[test]
    fn test_empty_date_never_keys() {
        let r = Record::new("", 1, 1, Money::ZERO, Money::ZERO, "");
        assert!(!r.keyed_by(""));
        let dated = Record::new("2024-02-01", 1, 1, Money::ZERO, Money::ZERO, "");
        assert!(dated.keyed_by("2024-02-01"));
        assert!(!dated.keyed_by("2024-02-02"));
    }

    #[test]
    fn test_serde_round_trip_keeps_inputs() {
        let r = Record::new("2024-01-01", 10, 8, money("2.00"), money("1.00"), "feed");
        let json = serde_json::to_string(&r).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
