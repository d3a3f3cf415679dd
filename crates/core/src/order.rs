//! Orders, shipping addresses and order pricing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{CarbonKg, OrderId, OrderStatus, Price, UserId};

/// Country used when the shopper does not pick one.
pub const DEFAULT_COUNTRY: &str = "US";

/// Address validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// A shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            line1: String::new(),
            line2: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Address {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            ("Address", &self.line1),
            ("City", &self.city),
            ("State", &self.state),
            ("Postal code", &self.postal_code),
            ("Country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Copy with surrounding whitespace removed and a blank `line2` dropped.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            line1: self.line1.trim().to_string(),
            line2: self
                .line2
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }

    /// Address lines for display.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.line1.clone()];
        if let Some(line2) = &self.line2 {
            lines.push(line2.clone());
        }
        lines.push(format!("{}, {} {}", self.city, self.state, self.postal_code));
        lines.push(self.country.clone());
        lines
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Totals derived from a merchandise subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricing {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    /// Credit subtracted from the checkout total.
    pub carbon_offset: Price,
}

impl OrderPricing {
    /// Flat carbon-offset credit, in cents.
    pub const CARBON_OFFSET_CENTS: i64 = 200;

    /// Eco points are awarded per this many dollars spent.
    pub const DOLLARS_PER_POINT: i64 = 10;

    /// 10%.
    #[must_use]
    pub fn tax_rate() -> Decimal {
        Decimal::new(1, 1)
    }

    /// Price a subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Price) -> Self {
        Self {
            subtotal,
            shipping: Price::ZERO,
            tax: subtotal.scale(Self::tax_rate()),
            carbon_offset: Price::from_cents(Self::CARBON_OFFSET_CENTS),
        }
    }

    /// Cart page total: subtotal, shipping and tax.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.subtotal + self.shipping + self.tax
    }

    /// Checkout total: the cart total less the offset credit, never negative.
    #[must_use]
    pub fn checkout_total(&self) -> Price {
        (self.cart_total() - self.carbon_offset).non_negative()
    }

    /// Eco points earned for this subtotal.
    #[must_use]
    pub fn points_earned(&self) -> u32 {
        points_for(self.subtotal)
    }
}

/// ⌊amount / 10⌋, zero for non-positive amounts, capped at `u32::MAX`.
#[must_use]
pub fn points_for(amount: Price) -> u32 {
    use rust_decimal::prelude::ToPrimitive;

    let points = (amount.amount() / Decimal::from(OrderPricing::DOLLARS_PER_POINT)).floor();
    if points.is_sign_negative() {
        0
    } else {
        points.to_u32().unwrap_or(u32::MAX)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    /// Merchandise subtotal.
    pub total_amount: Price,
    pub total_carbon: CarbonKg,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub status: OrderStatus,
    pub shipping_address: Address,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Assign an ID and creation time to a [`NewOrder`].
    #[must_use]
    pub fn from_new(new: NewOrder, id: OrderId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            items: new.items,
            total_amount: new.total_amount,
            total_carbon: new.total_carbon,
            payment_id: new.payment_id,
            status: new.status,
            shipping_address: new.shipping_address,
            created_at,
        }
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Pricing breakdown of this order.
    #[must_use]
    pub fn pricing(&self) -> OrderPricing {
        OrderPricing::for_subtotal(self.total_amount)
    }

    /// First eight characters of the ID, as shown in order lists.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

/// An order before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub total_amount: Price,
    pub total_carbon: CarbonKg,
    pub payment_id: Option<String>,
    pub status: OrderStatus,
    pub shipping_address: Address,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            postal_code: "411001".to_string(),
            country: "IN".to_string(),
        }
    }

    #[test]
    fn test_address_valid() {
        assert!(address().validate().is_ok());
    }

    #[test]
    fn test_address_reports_first_blank_field() {
        let mut a = address();
        a.city = "  ".to_string();
        a.postal_code = String::new();
        assert_eq!(a.validate(), Err(AddressError::MissingField("City")));
    }

    #[test]
    fn test_address_line2_optional_and_country_defaults() {
        let a = Address::default();
        assert_eq!(a.country, "US");
        assert!(a.line2.is_none());
        assert_eq!(a.validate(), Err(AddressError::MissingField("Address")));
    }

    #[test]
    fn test_normalized_drops_blank_line2() {
        let mut a = address();
        a.line1 = "  12 MG Road ".to_string();
        a.line2 = Some("   ".to_string());
        let n = a.normalized();
        assert_eq!(n.line1, "12 MG Road");
        assert!(n.line2.is_none());
    }

    #[test]
    fn test_pricing() {
        let pricing = OrderPricing::for_subtotal(Price::from_cents(10_000));
        assert_eq!(pricing.tax, Price::from_cents(1000));
        assert_eq!(pricing.shipping, Price::ZERO);
        assert_eq!(pricing.cart_total(), Price::from_cents(11_000));
        assert_eq!(pricing.checkout_total(), Price::from_cents(10_800));
        assert_eq!(pricing.points_earned(), 10);
    }

    #[test]
    fn test_checkout_total_never_negative() {
        let pricing = OrderPricing::for_subtotal(Price::from_cents(100));
        assert_eq!(pricing.checkout_total(), Price::ZERO);
    }

    #[test]
    fn test_points_floor() {
        assert_eq!(points_for(Price::from_cents(999)), 0);
        assert_eq!(points_for(Price::from_cents(1000)), 1);
        assert_eq!(points_for(Price::from_cents(12_999)), 12);
        assert_eq!(points_for(Price::from_cents(-5000)), 0);
    }

    #[test]
    fn test_points_saturate_on_huge_orders() {
        let subtotal = Price::from_cents(100_000) * u32::MAX;
        assert_eq!(points_for(subtotal), u32::MAX);
        assert_eq!(OrderPricing::for_subtotal(subtotal).points_earned(), u32::MAX);
    }

    #[test]
    fn test_lines_include_optional_line2() {
        let mut a = address();
        a.line2 = Some("Flat 4".to_string());
        assert_eq!(
            a.lines(),
            ["12 MG Road", "Flat 4", "Pune, MH 411001", "IN"]
        );
    }
}
