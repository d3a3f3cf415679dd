//! Administrator endpoints for catalog and order management.
//!
//! Every handler takes [`RequireAdmin`], so anonymous callers get 401 and
//! signed-in shoppers without the admin flag get 403.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use ecotrade_core::catalog::{NewProduct, Product, ProductUpdate};
use ecotrade_core::order::Order;
use ecotrade_core::{OrderId, OrderStatus, Price, ProductId};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, ApiResult};
use crate::db::{OrderRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Body for an order status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Highest price an administrator may set, in cents.
const MAX_PRICE_CENTS: i64 = 100_000_000;

fn check_price(price: Price) -> Result<(), AppError> {
    if price.amount().is_sign_negative() {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    if price > Price::from_cents(MAX_PRICE_CENTS) {
        return Err(AppError::BadRequest(format!(
            "price cannot exceed {}",
            Price::from_cents(MAX_PRICE_CENTS)
        )));
    }
    Ok(())
}

/// Reject blank names and out-of-range prices.
fn validate_new(product: &NewProduct) -> Result<(), AppError> {
    if product.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    check_price(product.price)
}

fn validate_update(update: &ProductUpdate) -> Result<(), AppError> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be blank".to_string()));
    }
    update.price.map_or(Ok(()), check_price)
}

/// POST /api/admin/products
///
/// # Errors
///
/// Returns 400 for a blank name or a price out of range.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_new(&product)?;
    let product = ProductRepository::new(state.store()).add(product).await;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /api/admin/products/{id}
///
/// # Errors
///
/// Returns 404 for an unknown product, 400 for invalid fields.
#[instrument(skip(state, admin, update), fields(admin_id = %admin.id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    validate_update(&update)?;
    let product = ProductRepository::new(state.store())
        .update(id, update)
        .await
        .map_err(AppError::from)?;
    Ok(Json(product))
}

/// DELETE /api/admin/products/{id}
///
/// # Errors
///
/// Returns 404 for an unknown product.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> ApiResult<StatusCode> {
    ProductRepository::new(state.store())
        .delete(id)
        .await
        .map_err(AppError::from)?;
    tracing::info!("Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/orders/{id}/status
///
/// # Errors
///
/// Returns 404 for an unknown order.
#[instrument(skip(state, admin, body), fields(admin_id = %admin.id, status = %body.status))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<Json<Order>> {
    OrderRepository::new(state.store())
        .update_status(id, body.status)
        .await
        .map(Json)
        .map_err(|err| ApiError::from(AppError::from(err)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecotrade_core::CarbonKg;
    use ecotrade_core::catalog::Category;
    use rust_decimal::Decimal;

    use super::*;

    fn new_product(name: &str, cents: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "Organic cotton tote".to_string(),
            price: Price::from_cents(cents),
            images: Vec::new(),
            category: Category::Accessories,
            carbon_footprint: CarbonKg::from_centi_kg(120),
            materials: vec!["Organic Cotton".to_string()],
            sustainability_score: 85,
            stock: 40,
            featured: false,
        }
    }

    #[test]
    fn test_validate_new() {
        assert!(validate_new(&new_product("Tote", 1500)).is_ok());
        assert!(validate_new(&new_product("  ", 1500)).is_err());
        assert!(validate_new(&new_product("Tote", -1)).is_err());
        assert!(validate_new(&new_product("Tote", MAX_PRICE_CENTS)).is_ok());
        assert!(validate_new(&new_product("Tote", MAX_PRICE_CENTS + 1)).is_err());
    }

    #[test]
    fn test_validate_update() {
        assert!(validate_update(&ProductUpdate::default()).is_ok());

        let blank = ProductUpdate {
            name: Some(String::new()),
            ..ProductUpdate::default()
        };
        assert!(validate_update(&blank).is_err());

        let negative = ProductUpdate {
            price: Some(Price::from_cents(-500)),
            ..ProductUpdate::default()
        };
        assert!(validate_update(&negative).is_err());

        let huge = ProductUpdate {
            price: Some(Price::new(Decimal::MAX)),
            ..ProductUpdate::default()
        };
        assert!(validate_update(&huge).is_err());
    }

    #[test]
    fn test_status_update_body() {
        let body: StatusUpdate = serde_json::from_str(r#"{"status":"shipped"}"#).unwrap();
        assert_eq!(body.status, OrderStatus::Shipped);
    }
}
