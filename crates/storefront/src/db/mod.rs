//! In-memory data layer standing in for a hosted document database.
//!
//! # Collections
//!
//! - `products` - Catalog, seeded with curated and generated products
//! - `orders` - Orders placed through checkout
//! - `users` - Shopper accounts, one per email
//! - `leaderboard` - Community eco-points standings
//!
//! Every repository call waits for the configured latency before touching a
//! collection, so pages behave as if the data were remote. Locks are taken
//! after the delay and never held across it.

pub mod leaderboard;
pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use std::time::Duration;

use ecotrade_core::catalog::Product;
use ecotrade_core::leaderboard::LeaderboardEntry;
use ecotrade_core::order::Order;
use ecotrade_core::user::User;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::DatastoreConfig;

pub use leaderboard::LeaderboardRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Shared in-memory collections.
pub struct Datastore {
    latency: Duration,
    pub(crate) products: RwLock<Vec<Product>>,
    pub(crate) orders: RwLock<Vec<Order>>,
    pub(crate) users: RwLock<Vec<User>>,
    pub(crate) leaderboard: RwLock<Vec<LeaderboardEntry>>,
}

impl Datastore {
    /// Create a datastore populated with the demo catalog and leaderboard.
    #[must_use]
    pub fn seeded(config: &DatastoreConfig) -> Self {
        let data = seed::SeedData::generate(config.seed);
        tracing::info!(
            products = data.products.len(),
            leaderboard = data.leaderboard.len(),
            seed = ?config.seed,
            "Datastore seeded"
        );
        Self::with_data(config.latency, data.products, data.leaderboard)
    }

    /// Create a datastore holding exactly the given products and standings.
    #[must_use]
    pub fn with_data(
        latency: Duration,
        products: Vec<Product>,
        leaderboard: Vec<LeaderboardEntry>,
    ) -> Self {
        Self {
            latency,
            products: RwLock::new(products),
            orders: RwLock::new(Vec::new()),
            users: RwLock::new(Vec::new()),
            leaderboard: RwLock::new(leaderboard),
        }
    }

    /// Whether the collections can be read within `timeout`.
    pub async fn ping(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.products.read())
            .await
            .is_ok()
    }

    /// Simulated round trip.
    pub(crate) async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl std::fmt::Debug for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datastore")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}
