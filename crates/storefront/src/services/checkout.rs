//! Order placement.
//!
//! Turns a validated checkout into a paid order and credits the shopper's
//! account and leaderboard standing.

use ecotrade_core::cart::Cart;
use ecotrade_core::checkout::{CheckoutError, PaymentMethod};
use ecotrade_core::impact::PurchaseImpact;
use ecotrade_core::order::{Address, NewOrder, Order, OrderPricing, points_for};
use ecotrade_core::user::User;
use ecotrade_core::OrderStatus;
use thiserror::Error;

use super::payment::{PaymentClient, PaymentError};
use crate::db::{Datastore, LeaderboardRepository, OrderRepository, RepositoryError, UserRepository};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// The gateway rejected the payment signature.
    #[error("payment could not be verified")]
    PaymentNotVerified,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a successful order placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    /// The buyer's account after the purchase was credited.
    pub user: User,
    pub impact: PurchaseImpact,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    store: &'a Datastore,
    payments: &'a PaymentClient,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(store: &'a Datastore, payments: &'a PaymentClient) -> Self {
        Self { store, payments }
    }

    /// Charge for the cart and record the order.
    ///
    /// The order is persisted as paid, the buyer's footprint and points are
    /// updated, and their leaderboard entry is created or credited.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` (wrapped) for an empty cart,
    /// `PlaceOrderError::Payment` if the gateway refuses the order, and
    /// `PlaceOrderError::Repository` if the buyer's account has disappeared.
    #[tracing::instrument(skip_all, fields(user_id = %user.id, items = cart.total_items()))]
    pub async fn place_order(
        &self,
        user: &User,
        cart: &Cart,
        address: &Address,
        payment: &PaymentMethod,
    ) -> Result<PlacedOrder, PlaceOrderError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }

        let pricing = OrderPricing::for_subtotal(cart.total_amount());
        let gateway_order = self.payments.create_order(pricing.checkout_total()).await?;
        let signature = format!("mock_{}", gateway_order.id);
        if !self
            .payments
            .verify_payment(&gateway_order.id, &gateway_order.id, &signature)
            .await
        {
            return Err(PlaceOrderError::PaymentNotVerified);
        }

        let order = OrderRepository::new(self.store)
            .create(NewOrder {
                user_id: user.id,
                items: cart.items().to_vec(),
                total_amount: pricing.subtotal,
                total_carbon: cart.total_carbon(),
                payment_id: Some(gateway_order.id),
                status: OrderStatus::Paid,
                shipping_address: address.clone(),
            })
            .await;

        let users = UserRepository::new(self.store);
        let mut buyer = users.get_by_id(user.id).await.unwrap_or_else(|| user.clone());
        buyer.record_purchase(&order);
        users.save(&buyer).await?;

        let impact = PurchaseImpact::for_footprint(order.total_carbon);
        LeaderboardRepository::new(self.store)
            .upsert_user(&buyer, points_for(order.total_amount), impact.carbon_saved)
            .await;

        tracing::info!(
            order_id = %order.id,
            total = %order.total_amount,
            carbon = %order.total_carbon,
            payment = %payment,
            "Order placed"
        );

        Ok(PlacedOrder {
            order,
            user: buyer,
            impact,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use ecotrade_core::{CarbonKg, Email, Price};

    use super::*;
    use crate::db::seed::SeedData;

    fn address() -> Address {
        Address {
            line1: "5 Residency Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            postal_code: "560025".to_string(),
            country: "IN".to_string(),
        }
    }

    async fn setup() -> (Datastore, User) {
        let data = SeedData::generate(Some(5));
        let store = Datastore::with_data(Duration::ZERO, data.products, data.leaderboard);
        let user = UserRepository::new(&store)
            .create(User::new(
                Email::parse("ankit@college.edu").unwrap(),
                false,
                Utc::now(),
            ))
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_place_order_credits_user_and_leaderboard() {
        let (store, user) = setup().await;
        let payments = PaymentClient::default();
        let products = crate::db::ProductRepository::new(&store).get_all().await;

        // tote bag $25.00 x2 (2.5 kg each) and notebook $12.00 (0.5 kg)
        let mut cart = Cart::new();
        cart.add(products[0].clone(), 2);
        cart.add(products[4].clone(), 1);

        let placed = CheckoutService::new(&store, &payments)
            .place_order(&user, &cart, &address(), &PaymentMethod::PayPal)
            .await
            .unwrap();

        assert_eq!(placed.order.status, OrderStatus::Paid);
        assert_eq!(placed.order.total_amount, Price::from_cents(6200));
        assert_eq!(placed.order.total_carbon, CarbonKg::from_centi_kg(550));
        assert!(placed.order.payment_id.as_deref().unwrap().starts_with("order_"));

        assert_eq!(placed.user.points, 6);
        assert_eq!(placed.user.carbon_footprint, CarbonKg::from_centi_kg(550));
        let stored = UserRepository::new(&store).get_by_id(user.id).await.unwrap();
        assert_eq!(stored.points, 6);

        let board = LeaderboardRepository::new(&store).entries().await;
        let mine = board.iter().find(|r| r.entry.user_id == user.id).unwrap();
        assert_eq!(mine.entry.points, 6);
        assert_eq!(mine.entry.carbon_saved, placed.impact.carbon_saved);

        let orders = OrderRepository::new(&store).get_by_user_id(user.id).await;
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let (store, user) = setup().await;
        let payments = PaymentClient::default();
        let result = CheckoutService::new(&store, &payments)
            .place_order(&user, &Cart::new(), &address(), &PaymentMethod::PayPal)
            .await;
        assert!(matches!(
            result,
            Err(PlaceOrderError::Checkout(CheckoutError::EmptyCart))
        ));
    }
}
