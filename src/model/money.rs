//! Money type for monetary ledger fields.
//!
//! Wraps `Decimal` and parses values that may carry a dollar sign or
//! thousands commas. Display is always fixed two-decimal, which is the
//! format every export surface uses.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// A non-negative-or-negative dollar amount with value semantics.
///
/// Equality and ordering are numeric: `12.5` and `12.50` are equal.
///
/// ```
/// # use coop_ledger::model::Money;
/// # use std::str::FromStr;
/// let m = Money::from_str("$1,250.5").unwrap();
/// assert_eq!(m.to_string(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// The underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Parse a cell or form value, falling back to zero when it is not a
    /// number. Import rows never fail outright on a bad monetary cell.
    pub fn parse_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// An error that can occur when parsing strings into `Money` values.
#[derive(Debug, thiserror::Error)]
#[error("not a monetary value: {0}")]
pub struct MoneyError(String);

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Money::default());
        }

        // Accept "-$50.00", "$50.00", "1,000.00" and plain numbers.
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let bare = unsigned.strip_prefix('$').unwrap_or(unsigned);
        let mut cleaned = bare.replace(',', "");
        if trimmed.starts_with('-') {
            cleaned.insert(0, '-');
        }

        let value = Decimal::from_str(&cleaned).map_err(|_| MoneyError(s.to_string()))?;
        Ok(Money(value))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{rounded:.2}")
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

/// Unit price times a count, e.g. `price * sold`.
impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, count: u32) -> Money {
        Money(self.0 * Decimal::from(count))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
