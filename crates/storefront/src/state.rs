//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::Datastore;
use crate::services::payment::PaymentClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the data layer, payment gateway and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Datastore,
    payments: PaymentClient,
}

impl AppState {
    /// Create state with a freshly seeded datastore.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = Datastore::seeded(&config.datastore);
        Self::with_store(config, store)
    }

    /// Create state around an existing datastore.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, store: Datastore) -> Self {
        let payments = PaymentClient::new(config.datastore.latency);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                payments,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the data layer.
    #[must_use]
    pub fn store(&self) -> &Datastore {
        &self.inner.store
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }
}
