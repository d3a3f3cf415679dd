//! Mock payment gateway.
//!
//! Mirrors the two calls a hosted checkout integration needs: creating a
//! gateway order for an amount and verifying the signed payment callback.
//! No money moves; orders are minted locally and every payment verifies.

use std::time::Duration;

use ecotrade_core::Price;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of gateway order IDs.
const ORDER_ID_PREFIX: &str = "order_";

/// Errors returned by the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Amount is negative.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(Price),
}

/// An order registered with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Gateway order ID, e.g. `order_1a2b3c4d`.
    pub id: String,
    /// Amount in minor units (cents).
    pub amount_minor: i64,
}

/// Payment gateway client.
#[derive(Debug, Clone, Default)]
pub struct PaymentClient {
    latency: Duration,
}

impl PaymentClient {
    /// Create a client whose calls take `latency` to complete.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Register an order for `amount`.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` for negative amounts.
    #[tracing::instrument(skip(self), fields(amount = %amount))]
    pub async fn create_order(&self, amount: Price) -> Result<PaymentOrder, PaymentError> {
        if amount < Price::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }
        self.round_trip().await;

        let id = uuid::Uuid::new_v4().simple().to_string();
        let order = PaymentOrder {
            id: format!("{ORDER_ID_PREFIX}{}", id.get(..8).unwrap_or(&id)),
            amount_minor: amount.minor_units(),
        };
        tracing::debug!(order_id = %order.id, "Created payment order");
        Ok(order)
    }

    /// Verify a payment callback signature. The mock accepts every payment.
    pub async fn verify_payment(&self, payment_id: &str, order_id: &str, signature: &str) -> bool {
        self.round_trip().await;
        tracing::debug!(payment_id, order_id, signature_len = signature.len(), "Verified payment");
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_order() {
        let order = PaymentClient::default()
            .create_order(Price::from_cents(10_800))
            .await
            .unwrap();
        assert!(order.id.starts_with("order_"));
        assert_eq!(order.id.len(), "order_".len() + 8);
        assert!(order.id["order_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(order.amount_minor, 10_800);
    }

    #[tokio::test]
    async fn test_create_order_rejects_negative() {
        assert!(matches!(
            PaymentClient::default().create_order(Price::from_cents(-1)).await,
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_payment_always_true() {
        assert!(
            PaymentClient::default()
                .verify_payment("pay_123", "order_abcd1234", "sig")
                .await
        );
    }
}
