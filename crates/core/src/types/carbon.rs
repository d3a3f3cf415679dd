//! Carbon footprint amounts and impact bands.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Kilograms of CO₂ equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarbonKg(Decimal);

impl CarbonKg {
    /// No emissions.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from decimal kilograms.
    #[must_use]
    pub const fn new(kg: Decimal) -> Self {
        Self(kg)
    }

    /// Create an amount from hundredths of a kilogram (e.g. `250` → 2.5 kg).
    #[must_use]
    pub fn from_centi_kg(centi: i64) -> Self {
        Self(Decimal::new(centi, 2))
    }

    /// The decimal kilogram amount.
    #[must_use]
    pub const fn kg(&self) -> Decimal {
        self.0
    }

    /// Multiply by a factor (comparisons against conventional goods).
    #[must_use]
    pub fn scale(&self, factor: Decimal) -> Self {
        Self(self.0.saturating_mul(factor))
    }

    /// The impact band this amount falls into.
    #[must_use]
    pub fn band(&self) -> ImpactBand {
        ImpactBand::classify(*self)
    }

    /// Amount rounded to one decimal, as shown to shoppers.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for CarbonKg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} kg CO₂", self.rounded())
    }
}

impl Add for CarbonKg {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for CarbonKg {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for CarbonKg {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for CarbonKg {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Low/medium/high classification of a carbon footprint.
///
/// Boundaries: below 10 kg is low, 10 kg up to (not including) 30 kg is
/// medium, 30 kg and above is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBand {
    Low,
    Medium,
    High,
}

impl ImpactBand {
    const MEDIUM_FROM_KG: i64 = 10;
    const HIGH_FROM_KG: i64 = 30;

    /// Classify a footprint.
    #[must_use]
    pub fn classify(carbon: CarbonKg) -> Self {
        if carbon.kg() < Decimal::from(Self::MEDIUM_FROM_KG) {
            Self::Low
        } else if carbon.kg() < Decimal::from(Self::HIGH_FROM_KG) {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Badge label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Impact",
            Self::Medium => "Medium Impact",
            Self::High => "High Impact",
        }
    }

    /// Lowercase identifier, also used as the filter value and CSS modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Article-prefixed description for product copy ("a low", "a medium").
    #[must_use]
    pub const fn with_article(&self) -> &'static str {
        match self {
            Self::Low => "a low",
            Self::Medium => "a medium",
            Self::High => "a high",
        }
    }

    /// How much lower than a conventional equivalent a product in this band is, in percent.
    #[must_use]
    pub const fn reduction_vs_conventional(&self) -> u8 {
        match self {
            Self::Low => 60,
            Self::Medium => 30,
            Self::High => 10,
        }
    }
}

impl fmt::Display for ImpactBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
