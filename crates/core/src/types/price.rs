//! Price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers. They are held as [`Decimal`] so that
//! sums such as `10.00 + 5.505` round to `15.51` instead of drifting through
//! binary floating point. No currency is tracked; the storefront displays
//! every amount in dollars.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A product price in the store currency.
///
/// Serialized as a plain JSON number to match the catalog API and the stored
/// cart snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole cents, e.g. `999` for `$9.99`.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The exact amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(999).display(), "$9.99");
        assert_eq!(Price::new(Decimal::new(10, 0)).display(), "$10.00");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(15_505, 3)).display(), "$15.51");
        assert_eq!(Price::new(Decimal::new(1_004, 3)).display(), "$1.00");
    }

    #[test]
    fn test_sum() {
        let prices = [
            Price::new(Decimal::new(1000, 2)),
            Price::new(Decimal::new(5505, 3)),
        ];
        let total: Price = prices.iter().sum();
        assert_eq!(total.amount(), Decimal::new(15_505, 3));
        assert_eq!(total.display(), "$15.51");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(1095)).unwrap();
        assert!(json.is_number());

        let price: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(price, Price::from_cents(10_995));
    }
}
