//! Cart route handlers.
//!
//! The cart lives in the session. Mutations answer HTMX requests with a
//! fragment plus a `cart-updated` trigger, and plain form posts with a
//! redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use ecotrade_core::cart::{Cart, CartItem};
use ecotrade_core::impact::CartImpact;
use ecotrade_core::order::OrderPricing;
use ecotrade_core::{CarbonKg, Price, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::is_htmx;
use crate::db::ProductRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::PageContext;
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Price,
    pub tax: Price,
    pub total: Price,
    pub carbon: CarbonKg,
    pub impact: CartImpact,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let pricing = OrderPricing::for_subtotal(cart.total_amount());
        let carbon = cart.total_carbon();
        Self {
            items: cart.items().to_vec(),
            item_count: cart.total_items(),
            subtotal: pricing.subtotal,
            tax: pricing.tax,
            total: pricing.cart_total(),
            carbon,
            impact: CartImpact::for_footprint(carbon),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart items and summary fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(page, session))]
pub async fn show(page: PageContext, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        page,
        cart: CartView::from(&cart),
    }
}

/// Respond to a cart mutation.
fn mutated(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

/// Add item to cart.
///
/// HTMX requests get the refreshed count badge; other requests are
/// redirected to the cart page.
///
/// # Errors
///
/// Returns 404 if the product does not exist.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = ProductRepository::new(state.store())
        .get_by_id(form.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = load_cart(&session).await;
    cart.add(product, form.quantity.unwrap_or(1));
    save_cart(&session, &cart).await?;

    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]),
            CartCountTemplate {
                count: cart.total_items(),
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to("/cart").into_response())
    }
}

/// Update a line's quantity (clamped to at least one).
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(form.product_id, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(mutated(&headers, &cart))
}

/// Remove a line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.remove(form.product_id);
    save_cart(&session, &cart).await?;
    Ok(mutated(&headers, &cart))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(mutated(&headers, &cart))
}

/// Get cart count badge (HTMX fragment).
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: load_cart(&session).await.total_items(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ecotrade_core::catalog::{Category, Product};

    use super::*;

    fn product(cents: i64, carbon_centi: i64) -> Product {
        Product {
            id: ProductId::generate(),
            name: "Bamboo Toothbrush".to_string(),
            description: String::new(),
            price: Price::from_cents(cents),
            images: Vec::new(),
            category: Category::Accessories,
            carbon_footprint: CarbonKg::from_centi_kg(carbon_centi),
            materials: Vec::new(),
            sustainability_score: 80,
            stock: 10,
            created_at: Utc::now(),
            featured: false,
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(product(2500, 250), 2);
        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, Price::from_cents(5000));
        assert_eq!(view.tax, Price::from_cents(500));
        assert_eq!(view.total, Price::from_cents(5500));
        assert_eq!(view.carbon, CarbonKg::from_centi_kg(500));
        assert_eq!(view.impact.savings_percentage, 60);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.total, Price::ZERO);
        assert_eq!(view.impact.savings_percentage, 0);
    }
}
