//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront amounts are US dollars, so a [`Price`] carries no currency
//! code; it exists to keep money out of `f64` and to format consistently.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A dollar amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole cents (e.g. `1999` → `$19.99`).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal dollar amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount in minor units (cents), rounded half away from zero.
    ///
    /// Payment gateways take amounts in minor units.
    #[must_use]
    pub fn minor_units(&self) -> i64 {
        self.0
            .saturating_mul(Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(i64::MAX)
    }

    /// Multiply by a rate (e.g. a tax rate), rounded to cents.
    #[must_use]
    pub fn scale(&self, rate: Decimal) -> Self {
        Self(self.0.saturating_mul(rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Clamp negative amounts to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        if self.0.is_sign_negative() {
            Self::ZERO
        } else {
            self
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-${:.2}", rounded.abs())
        } else {
            write!(f, "${:.2}", rounded.abs())
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::from_cents(2500).to_string(), "$25.00");
        assert_eq!(Price::from_cents(12_995).to_string(), "$129.95");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::from_cents(-200).to_string(), "-$2.00");
    }

    #[test]
    fn test_line_arithmetic() {
        let line = Price::from_cents(1800) * 3;
        assert_eq!(line, Price::from_cents(5400));

        let total: Price = [Price::from_cents(1200), Price::from_cents(8500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(9700));
    }

    #[test]
    fn test_scale_rounds_to_cents() {
        // 10% of $12.35 is $1.235, which rounds away from zero
        let tax = Price::from_cents(1235).scale(Decimal::new(1, 1));
        assert_eq!(tax, Price::from_cents(124));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Price::from_cents(12_995).minor_units(), 12_995);
        assert_eq!(Price::new(Decimal::new(1_005, 3)).minor_units(), 101);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max + Price::from_cents(1), max);
        assert_eq!(Price::new(Decimal::MIN) - Price::from_cents(1), Price::new(Decimal::MIN));
        assert_eq!(max.minor_units(), i64::MAX);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(Price::from_cents(-1).non_negative(), Price::ZERO);
        assert_eq!(Price::from_cents(1).non_negative(), Price::from_cents(1));
    }
}
