//! Carbon savings estimates shown to shoppers.
//!
//! Two estimates exist: the cart page compares the cart against conventional
//! equivalents ([`CartImpact`]), and the confirmation and profile pages report
//! what a completed purchase saved ([`PurchaseImpact`]). All rounding is half
//! away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::CarbonKg;

/// Kilograms of CO₂ one tree absorbs in the estimate.
const KG_PER_TREE: i64 = 10;

/// Kilometres of driving per kilogram of CO₂.
const KM_PER_KG: i64 = 6;

fn round_whole(value: Decimal) -> u32 {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() {
        0
    } else {
        rounded.to_u32().unwrap_or(u32::MAX)
    }
}

/// Trees needed to absorb `saved` kilograms, never less than one.
#[must_use]
pub fn trees_for(saved: CarbonKg) -> u32 {
    round_whole(saved.kg() / Decimal::from(KG_PER_TREE)).max(1)
}

/// Cart compared with conventional products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartImpact {
    pub footprint: CarbonKg,
    /// Estimated footprint of conventional equivalents.
    pub traditional: CarbonKg,
    pub savings: CarbonKg,
    /// Whole percent.
    pub savings_percentage: u32,
    pub trees_equivalent: u32,
}

impl CartImpact {
    /// Conventional goods are estimated at 2.5 times the eco footprint.
    #[must_use]
    pub fn traditional_factor() -> Decimal {
        Decimal::new(25, 1)
    }

    #[must_use]
    pub fn for_footprint(footprint: CarbonKg) -> Self {
        let traditional = footprint.scale(Self::traditional_factor());
        let savings = traditional - footprint;
        let savings_percentage = if traditional.kg().is_zero() {
            0
        } else {
            round_whole(savings.kg() / traditional.kg() * Decimal::ONE_HUNDRED)
        };
        Self {
            footprint,
            traditional,
            savings,
            savings_percentage,
            trees_equivalent: trees_for(savings),
        }
    }
}

/// What a completed purchase saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseImpact {
    pub footprint: CarbonKg,
    pub carbon_saved: CarbonKg,
    pub trees_equivalent: u32,
    pub km_not_driven: u32,
}

impl PurchaseImpact {
    /// A purchase is credited with 1.5 times its footprint.
    #[must_use]
    pub fn saved_factor() -> Decimal {
        Decimal::new(15, 1)
    }

    #[must_use]
    pub fn for_footprint(footprint: CarbonKg) -> Self {
        let carbon_saved = footprint.scale(Self::saved_factor());
        Self {
            footprint,
            carbon_saved,
            trees_equivalent: trees_for(carbon_saved),
            km_not_driven: round_whole(carbon_saved.kg().saturating_mul(Decimal::from(KM_PER_KG))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_whole_saturates() {
        assert_eq!(round_whole(Decimal::new(-15, 1)), 0);
        assert_eq!(round_whole(Decimal::new(25, 1)), 3);
        assert_eq!(round_whole(Decimal::MAX), u32::MAX);
    }

    #[test]
    fn test_cart_impact() {
        let impact = CartImpact::for_footprint(CarbonKg::from_centi_kg(2000));
        assert_eq!(impact.traditional, CarbonKg::from_centi_kg(5000));
        assert_eq!(impact.savings, CarbonKg::from_centi_kg(3000));
        assert_eq!(impact.savings_percentage, 60);
        assert_eq!(impact.trees_equivalent, 3);
    }

    #[test]
    fn test_cart_impact_zero_footprint() {
        let impact = CartImpact::for_footprint(CarbonKg::ZERO);
        assert_eq!(impact.savings_percentage, 0);
        assert_eq!(impact.trees_equivalent, 1);
    }

    #[test]
    fn test_trees_round_half_away_from_zero() {
        // savings = 1.5 * 10 = 15 kg -> 1.5 trees -> 2
        let impact = CartImpact::for_footprint(CarbonKg::from_centi_kg(1000));
        assert_eq!(impact.trees_equivalent, 2);
    }

    #[test]
    fn test_purchase_impact() {
        let impact = PurchaseImpact::for_footprint(CarbonKg::from_centi_kg(2000));
        assert_eq!(impact.carbon_saved, CarbonKg::from_centi_kg(3000));
        assert_eq!(impact.trees_equivalent, 3);
        assert_eq!(impact.km_not_driven, 180);
    }

    #[test]
    fn test_purchase_impact_small_order_gets_one_tree() {
        let impact = PurchaseImpact::for_footprint(CarbonKg::from_centi_kg(120));
        assert_eq!(impact.carbon_saved, CarbonKg::from_centi_kg(180));
        assert_eq!(impact.trees_equivalent, 1);
        // 1.8 * 6 = 10.8
        assert_eq!(impact.km_not_driven, 11);
    }
}
