//! Integer money representation.
//!
//! Every price in the system is a whole number of rubles. There are no
//! fractional amounts anywhere in the catalog or the order history, so
//! `Money` wraps an `i64` directly instead of a decimal type.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

/// An amount of money in whole rubles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// The largest representable amount. Used as the open upper bound of
    /// the top price band.
    pub const MAX: Self = Self(i64::MAX);

    /// Create an amount from whole rubles.
    #[must_use]
    pub const fn new(rubles: i64) -> Self {
        Self(rubles)
    }

    /// Get the underlying ruble amount.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Multiply by a line quantity, saturating at the numeric bounds.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Add another amount, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc.saturating_add(m))
    }
}

impl From<i64> for Money {
    fn from(rubles: i64) -> Self {
        Self(rubles)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    /// Renders with thin-space digit grouping and the ruble sign,
    /// e.g. `1 250 000 ₽`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }
        if negative {
            write!(f, "-{grouped} ₽")
        } else {
            write!(f, "{grouped} ₽")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::new(0).to_string(), "0 ₽");
        assert_eq!(Money::new(950).to_string(), "950 ₽");
        assert_eq!(Money::new(1_000).to_string(), "1 000 ₽");
        assert_eq!(Money::new(85_500).to_string(), "85 500 ₽");
        assert_eq!(Money::new(1_250_000).to_string(), "1 250 000 ₽");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Money::new(-15_000).to_string(), "-15 000 ₽");
    }

    #[test]
    fn test_times_and_sum() {
        let line = Money::new(1_000).times(2);
        assert_eq!(line, Money::new(2_000));

        let total: Money = [Money::new(2_000), Money::new(500)].into_iter().sum();
        assert_eq!(total, Money::new(2_500));
    }

    #[test]
    fn test_times_saturates() {
        assert_eq!(Money::MAX.times(2), Money::MAX);
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Money::new(990_000)).unwrap();
        assert_eq!(json, "990000");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::new(990_000));
    }
}
