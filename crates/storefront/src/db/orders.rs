//! Order repository.

use chrono::Utc;
use ecotrade_core::order::{NewOrder, Order};
use ecotrade_core::{OrderId, OrderStatus, UserId};

use super::{Datastore, RepositoryError};

/// Repository for order operations.
pub struct OrderRepository<'a> {
    store: &'a Datastore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a Datastore) -> Self {
        Self { store }
    }

    /// A shopper's orders, newest first.
    pub async fn get_by_user_id(&self, user_id: UserId) -> Vec<Order> {
        self.store.delay().await;
        let mut orders: Vec<Order> = self
            .store
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub async fn get_by_id(&self, id: OrderId) -> Option<Order> {
        self.store.delay().await;
        self.store
            .orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// Persist an order with a fresh ID and the current time.
    pub async fn create(&self, order: NewOrder) -> Order {
        self.store.delay().await;
        let order = Order::from_new(order, OrderId::generate(), Utc::now());
        self.store.orders.write().await.push(order.clone());
        order
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        self.store.delay().await;
        let mut orders = self.store.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.status = status;
        Ok(order.clone())
    }
}
