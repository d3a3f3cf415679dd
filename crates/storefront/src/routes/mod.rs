//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About page
//! GET  /leaderboard            - Community leaderboard
//!
//! # Products
//! GET  /products               - Product listing with filters
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (count fragment, triggers cart-updated)
//! POST /cart/update            - Update quantity (cart_items fragment)
//! POST /cart/remove            - Remove item (cart_items fragment)
//! POST /cart/clear             - Empty the cart (cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Current step
//! POST /checkout/shipping      - Submit shipping address
//! POST /checkout/payment       - Submit payment details
//! POST /checkout/back          - Previous step
//! POST /checkout/place         - Place the order (requires auth)
//! GET  /checkout/confirmation/{id} - Order confirmation (requires auth)
//!
//! # Auth
//! GET  /login, POST /login     - Sign in (POST rate limited)
//! GET  /signup, POST /signup   - Create account (POST rate limited)
//! POST /logout                 - Sign out
//!
//! # Profile (requires auth)
//! GET  /profile?tab=...        - Overview, orders, impact, settings
//! POST /profile/settings       - Update display name
//!
//! # JSON API
//! GET    /api/products                  - Filtered listing
//! GET    /api/products/{id}             - One product
//! GET    /api/leaderboard               - Ranked standings
//! GET    /api/cart                      - Session cart with totals
//! POST   /api/admin/products            - Create product (admin)
//! PATCH  /api/admin/products/{id}       - Update product (admin)
//! DELETE /api/admin/products/{id}       - Delete product (admin)
//! PATCH  /api/admin/orders/{id}/status  - Change order status (admin)
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod leaderboard;
pub mod pages;
pub mod products;
pub mod profile;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::config::StorefrontConfig;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// Create the auth routes router.
pub fn auth_routes(rate_limited: bool) -> Router<AppState> {
    let submit = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup));
    let submit = if rate_limited {
        submit.route_layer(auth_rate_limiter())
    } else {
        submit
    };

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/signup", get(auth::signup_page))
        .route("/logout", post(auth::logout))
        .merge(submit)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/shipping", post(checkout::shipping))
        .route("/payment", post(checkout::payment))
        .route("/back", post(checkout::back))
        .route("/place", post(checkout::place))
        .route("/confirmation/{id}", get(checkout::confirmation))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/settings", post(profile::update_settings))
}

/// Create the JSON API router.
pub fn api_routes(rate_limited: bool) -> Router<AppState> {
    use axum::routing::patch;

    let router = Router::new()
        .route("/products", get(api::products))
        .route("/products/{id}", get(api::product))
        .route("/leaderboard", get(api::leaderboard))
        .route("/cart", get(api::cart))
        .route("/admin/products", post(api::admin::create_product))
        .route(
            "/admin/products/{id}",
            patch(api::admin::update_product).delete(api::admin::delete_product),
        )
        .route(
            "/admin/orders/{id}/status",
            patch(api::admin::update_order_status),
        );

    if rate_limited {
        router.route_layer(api_rate_limiter())
    } else {
        router
    }
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    let rate_limited = config.rate_limit_enabled;
    if !rate_limited {
        tracing::warn!("Rate limiting disabled");
    }

    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/leaderboard", get(leaderboard::show))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/profile", profile_routes())
        .merge(auth_routes(rate_limited))
        .nest("/api", api_routes(rate_limited))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
