//! Checkout route handlers.
//!
//! Checkout runs as a three-step form (shipping, payment, review) whose
//! progress is kept in the session. Each POST validates its step and
//! redirects back to `GET /checkout`; validation failures re-render the
//! current step with the message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use ecotrade_core::cart::{Cart, CartItem};
use ecotrade_core::checkout::{CheckoutError, CheckoutState, CheckoutStep, PaymentDetails};
use ecotrade_core::impact::PurchaseImpact;
use ecotrade_core::order::{Address, DEFAULT_COUNTRY, Order, OrderPricing};
use ecotrade_core::{CarbonKg, OrderId, Price};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::auth::{OptionalAuth, RequireAuth, login_url};
use crate::models::PageContext;
use crate::models::session::{
    clear_checkout, load_cart, load_checkout, save_cart, save_checkout, set_current_user,
};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

// =============================================================================
// Forms
// =============================================================================

/// Shipping address form, also used to prefill the inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingForm {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl Default for ShippingForm {
    fn default() -> Self {
        Self::from(&Address::default())
    }
}

impl From<&Address> for ShippingForm {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.line1.clone(),
            line2: address.line2.clone().unwrap_or_default(),
            city: address.city.clone(),
            state: address.state.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

/// A blank country falls back to [`DEFAULT_COUNTRY`].
impl From<ShippingForm> for Address {
    fn from(form: ShippingForm) -> Self {
        let country = if form.country.trim().is_empty() {
            DEFAULT_COUNTRY.to_string()
        } else {
            form.country
        };
        Self {
            line1: form.line1,
            line2: Some(form.line2),
            city: form.city,
            state: form.state,
            postal_code: form.postal_code,
            country,
        }
    }
}

/// Payment form. Not `Debug`: it carries the full card number.
#[derive(Deserialize)]
pub struct PaymentForm {
    pub method: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_holder: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
}

impl From<PaymentForm> for PaymentDetails {
    fn from(form: PaymentForm) -> Self {
        if form.method == "paypal" {
            Self::PayPal
        } else {
            Self::Card {
                number: form.card_number,
                holder: form.card_holder,
                expiry: form.expiry,
                cvv: form.cvv,
            }
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

/// A step in the progress indicator.
#[derive(Debug, Clone)]
pub struct StepView {
    pub number: u8,
    pub label: &'static str,
    /// `done`, `current` or `upcoming`.
    pub status: &'static str,
}

fn step_views(current: CheckoutStep) -> Vec<StepView> {
    CheckoutStep::ALL
        .iter()
        .map(|step| StepView {
            number: step.number(),
            label: step.label(),
            status: match step.cmp(&current) {
                std::cmp::Ordering::Less => "done",
                std::cmp::Ordering::Equal => "current",
                std::cmp::Ordering::Greater => "upcoming",
            },
        })
        .collect()
}

/// Order summary shown beside every step.
#[derive(Debug, Clone)]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub carbon_offset: Price,
    pub total: Price,
    pub carbon: CarbonKg,
    pub points: u32,
}

impl From<&Cart> for CheckoutSummary {
    fn from(cart: &Cart) -> Self {
        let pricing = OrderPricing::for_subtotal(cart.total_amount());
        Self {
            items: cart.items().to_vec(),
            subtotal: pricing.subtotal,
            shipping: pricing.shipping,
            tax: pricing.tax,
            carbon_offset: pricing.carbon_offset,
            total: pricing.checkout_total(),
            carbon: cart.total_carbon(),
            points: pricing.points_earned(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub steps: Vec<StepView>,
    pub on_shipping: bool,
    pub on_payment: bool,
    pub on_review: bool,
    pub shipping: ShippingForm,
    pub address_lines: Vec<String>,
    pub payment_label: Option<String>,
    pub summary: CheckoutSummary,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    fn new(page: PageContext, state: &CheckoutState, cart: &Cart, error: Option<String>) -> Self {
        Self {
            page,
            steps: step_views(state.step),
            on_shipping: state.step == CheckoutStep::Shipping,
            on_payment: state.step == CheckoutStep::Payment,
            on_review: state.step == CheckoutStep::Review,
            shipping: state
                .shipping
                .as_ref()
                .map(ShippingForm::from)
                .unwrap_or_default(),
            address_lines: state
                .shipping
                .as_ref()
                .map(Address::lines)
                .unwrap_or_default(),
            payment_label: state.payment.as_ref().map(ToString::to_string),
            summary: CheckoutSummary::from(cart),
            error,
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub page: PageContext,
    pub order: Order,
    pub pricing: OrderPricing,
    pub impact: PurchaseImpact,
    pub order_date: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Re-render the current step with a validation message.
fn rejected(view: CheckoutTemplate) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, view).into_response()
}

fn with_error(
    page: PageContext,
    state: &CheckoutState,
    cart: &Cart,
    err: &CheckoutError,
) -> CheckoutTemplate {
    CheckoutTemplate::new(page, state, cart, Some(err.to_string()))
}

/// Display the current checkout step. An empty cart goes back to `/cart`.
#[instrument(skip(page, session))]
pub async fn show(page: PageContext, session: Session) -> Response {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }
    let state = load_checkout(&session).await;
    CheckoutTemplate::new(page, &state, &cart, None).into_response()
}

/// Submit the shipping address.
#[instrument(skip(page, session))]
pub async fn shipping(
    page: PageContext,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut state = load_checkout(&session).await;
    let submitted = form.clone();
    if let Err(err) = state.submit_shipping(form.into()) {
        let mut view = with_error(page, &state, &cart, &err);
        view.shipping = submitted;
        return Ok(rejected(view));
    }
    save_checkout(&session, &state).await?;
    Ok(Redirect::to("/checkout").into_response())
}

/// Submit payment details. Only the redacted method is kept.
#[instrument(skip_all)]
pub async fn payment(
    page: PageContext,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut state = load_checkout(&session).await;
    let details = PaymentDetails::from(form);
    if let Err(err) = state.submit_payment(&details) {
        return Ok(rejected(with_error(page, &state, &cart, &err)));
    }
    save_checkout(&session, &state).await?;
    Ok(Redirect::to("/checkout").into_response())
}

/// Go back one step.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Redirect> {
    let mut state = load_checkout(&session).await;
    state.back();
    save_checkout(&session, &state).await?;
    Ok(Redirect::to("/checkout"))
}

/// Place the order. Guests are sent to log in first.
///
/// On success the cart and checkout progress are cleared, the session user
/// is refreshed with the new points and footprint, and the shopper lands on
/// the confirmation page.
#[instrument(skip(state, page, session, user))]
pub async fn place(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    page: PageContext,
    session: Session,
) -> Result<Response> {
    let Some(user) = user else {
        return Ok(Redirect::to(&login_url("/checkout")).into_response());
    };

    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let checkout = load_checkout(&session).await;
    let (address, method) = match checkout.ready() {
        Ok(ready) => ready,
        Err(err) => return Ok(rejected(with_error(page, &checkout, &cart, &err))),
    };

    let placed = CheckoutService::new(state.store(), state.payments())
        .place_order(&user, &cart, address, method)
        .await?;

    cart.clear();
    save_cart(&session, &cart).await?;
    clear_checkout(&session).await?;
    set_current_user(&session, &placed.user).await?;

    let order_id = placed.order.id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));

    Ok(Redirect::to(&format!("/checkout/confirmation/{order_id}")).into_response())
}

/// Display the confirmation for one of the user's orders.
///
/// # Errors
///
/// Returns 404 if the order does not exist or belongs to someone else.
#[instrument(skip(state, page, user))]
pub async fn confirmation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.store())
        .get_by_id(id)
        .await
        .filter(|order| order.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(ConfirmationTemplate {
        page,
        pricing: order.pricing(),
        impact: PurchaseImpact::for_footprint(order.total_carbon),
        order_date: order.created_at.format("%B %-d, %Y").to_string(),
        order,
    })
}
