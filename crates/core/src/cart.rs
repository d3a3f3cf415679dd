//! Shopping cart.
//!
//! The cart keeps full product snapshots so totals can be computed without a
//! catalog lookup. Lines stay in insertion order.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{CarbonKg, Price, ProductId};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }

    /// Per-unit footprint times quantity.
    #[must_use]
    pub fn line_carbon(&self) -> CarbonKg {
        self.product.carbon_footprint * self.quantity
    }
}

/// A shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// A quantity of zero adds one unit.
    pub fn add(&mut self, product: Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
    }

    /// Drop the line for `product_id`, if present.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    /// Set the quantity of an existing line, clamped to at least one.
    ///
    /// Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity.max(1);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Merchandise subtotal.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Footprint of everything in the cart.
    #[must_use]
    pub fn total_carbon(&self) -> CarbonKg {
        self.items.iter().map(CartItem::line_carbon).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::catalog::Category;

    fn product(cents: i64, carbon_centi: i64) -> Product {
        Product {
            id: ProductId::generate(),
            name: "Bamboo Toothbrush".to_string(),
            description: String::new(),
            price: Price::from_cents(cents),
            images: Vec::new(),
            category: Category::Accessories,
            carbon_footprint: CarbonKg::from_centi_kg(carbon_centi),
            materials: vec!["Bamboo".to_string()],
            sustainability_score: 90,
            stock: 5,
            created_at: Utc::now(),
            featured: false,
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let p = product(500, 100);
        let mut cart = Cart::new();
        cart.add(p.clone(), 2);
        cart.add(p.clone(), 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_zero_adds_one() {
        let p = product(500, 100);
        let mut cart = Cart::new();
        cart.add(p.clone(), 0);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_insertion_order_kept() {
        let a = product(500, 100);
        let b = product(700, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), 1);
        cart.add(b.clone(), 1);
        cart.add(a.clone(), 1);
        assert_eq!(cart.items()[0].product.id, a.id);
        assert_eq!(cart.items()[1].product.id, b.id);
    }

    #[test]
    fn test_update_quantity_clamps_and_ignores_unknown() {
        let p = product(500, 100);
        let mut cart = Cart::new();
        cart.add(p.clone(), 4);
        cart.update_quantity(p.id, 0);
        assert_eq!(cart.get(p.id).unwrap().quantity, 1);

        cart.update_quantity(ProductId::generate(), 9);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let a = product(500, 100);
        let b = product(700, 100);
        let mut cart = Cart::new();
        cart.add(a.clone(), 1);
        cart.add(b, 1);
        cart.remove(a.id);
        cart.remove(ProductId::generate());
        assert_eq!(cart.items().len(), 1);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(product(2500, 250), 2);
        cart.add(product(1200, 50), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_amount(), Price::from_cents(6200));
        assert_eq!(cart.total_carbon(), CarbonKg::from_centi_kg(550));
    }

    #[test]
    fn test_empty_totals_are_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total_amount(), Price::ZERO);
        assert_eq!(cart.total_carbon(), CarbonKg::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_serde_roundtrip_for_session() {
        let mut cart = Cart::new();
        cart.add(product(999, 120), 2);
        let json = serde_json::to_value(&cart).unwrap();
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
