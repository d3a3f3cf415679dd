//! JSON API routes.
//!
//! Read-only catalog, leaderboard and cart endpoints for scripts and the
//! HTMX front end, plus the administrator endpoints in [`admin`].

pub mod admin;

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecotrade_core::cart::CartItem;
use ecotrade_core::catalog::Product;
use ecotrade_core::impact::CartImpact;
use ecotrade_core::leaderboard::RankedEntry;
use ecotrade_core::{CarbonKg, Price, ProductId};
use serde::Serialize;
use tower_sessions::Session;

use crate::db::{LeaderboardRepository, ProductRepository};
use crate::error::AppError;
use crate::models::session::load_cart;
use crate::routes::cart::CartView;
use crate::routes::products::ListingParams;
use crate::state::AppState;

/// Error body for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            error: msg.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&err);
            tracing::error!(error = %err, sentry_event_id = %event_id, "API error");
        }
        Self::new(status, err.public_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub total: usize,
    pub products: Vec<Product>,
}

/// Filtered, sorted product listing.
///
/// GET /api/products
pub async fn products(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Json<ProductList> {
    let params = ListingParams::parse(raw.as_deref());
    let catalog = ProductRepository::new(state.store()).get_all().await;
    let products = params.query.apply(&catalog);
    Json(ProductList {
        total: products.len(),
        products,
    })
}

/// GET /api/products/{id}
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> ApiResult<Json<Product>> {
    ProductRepository::new(state.store())
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")).into())
}

/// GET /api/leaderboard
pub async fn leaderboard(State(state): State<AppState>) -> Json<Vec<RankedEntry>> {
    Json(LeaderboardRepository::new(state.store()).entries().await)
}

/// Cart response.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    pub total_carbon: CarbonKg,
    pub impact: CartImpact,
}

impl From<CartView> for CartSummary {
    fn from(view: CartView) -> Self {
        Self {
            items: view.items,
            item_count: view.item_count,
            subtotal: view.subtotal,
            tax: view.tax,
            total: view.total,
            total_carbon: view.carbon,
            impact: view.impact,
        }
    }
}

/// The session's cart.
///
/// GET /api/cart
pub async fn cart(session: Session) -> Json<CartSummary> {
    let cart = load_cart(&session).await;
    Json(CartView::from(&cart).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn test_api_error_body() {
        let err: ApiError = AppError::NotFound("product 42".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Not found: product 42");
    }

    #[test]
    fn test_api_error_hides_internals() {
        let err: ApiError = AppError::Internal("lock poisoned".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error, "Internal server error");
    }
}
