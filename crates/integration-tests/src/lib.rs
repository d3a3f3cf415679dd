//! End-to-end test harness for the EcoTrade storefront.
//!
//! [`TestApp`] builds the full router around a freshly seeded, zero-latency
//! datastore and sends requests through it with `tower::ServiceExt::oneshot`.
//! The session cookie is tracked by hand so consecutive requests behave like
//! one browser.
//!
//! ```rust,ignore
//! let mut app = TestApp::new();
//! app.sign_in("maya@example.com").await;
//! let response = app.get("/profile").await;
//! assert_eq!(response.status, StatusCode::OK);
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use ecotrade_core::catalog::Product;
use ecotrade_storefront::config::{DatastoreConfig, StorefrontConfig};
use ecotrade_storefront::middleware::session::SESSION_COOKIE_NAME;
use ecotrade_storefront::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Catalog seed shared by every test app.
pub const TEST_SEED: u64 = 42;

/// Email granted the administrator role in test apps.
pub const ADMIN_EMAIL: &str = "admin@ecotrade.com";

/// A response with its body read into memory.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// `Location` header of a redirect.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// One simulated browser talking to a private storefront instance.
pub struct TestApp {
    router: Router,
    state: AppState,
    cookie: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Storefront configuration for tests: no latency, fixed seed, no rate limits.
    pub fn config() -> StorefrontConfig {
        StorefrontConfig {
            datastore: DatastoreConfig {
                latency: Duration::ZERO,
                seed: Some(TEST_SEED),
            },
            admin_email: ADMIN_EMAIL.to_string(),
            rate_limit_enabled: false,
            ..StorefrontConfig::default()
        }
    }

    pub fn new() -> Self {
        let state = AppState::new(Self::config());
        Self {
            router: ecotrade_storefront::app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Another browser against the same storefront, with no session.
    pub fn fresh_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            state: self.state.clone(),
            cookie: None,
        }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Send a request, attaching and then updating the session cookie.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();
        self.track_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn track_cookie(&mut self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let pair = value.split(';').next().unwrap_or_default().trim();
            let Some((name, token)) = pair.split_once('=') else {
                continue;
            };
            if name != SESSION_COOKIE_NAME {
                continue;
            }
            if token.is_empty() || value.to_ascii_lowercase().contains("max-age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair.to_string());
            }
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// GET with the `HX-Request` header set.
    pub async fn htmx_get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .header("HX-Request", "true")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(form_request(uri, fields, false)).await
    }

    /// Form POST as issued by HTMX.
    pub async fn htmx_post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(form_request(uri, fields, true)).await
    }

    /// Send a JSON body (or none) with the given method.
    pub async fn json(&mut self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Sign in (provisioning the account if needed) and return the response.
    pub async fn sign_in(&mut self, email: &str) -> TestResponse {
        let response = self
            .post_form("/login", &[("email", email), ("password", "correct-horse")])
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response
    }

    /// The full catalog, as served by the JSON API.
    pub async fn catalog(&mut self) -> Vec<Product> {
        let response = self.get("/api/products").await;
        assert_eq!(response.status, StatusCode::OK);
        serde_json::from_value(response.json()["products"].clone()).unwrap()
    }

    /// Some product that is in stock.
    pub async fn any_product(&mut self) -> Product {
        self.catalog()
            .await
            .into_iter()
            .find(|p| p.stock > 0)
            .unwrap()
    }

    /// Add `quantity` of a product through the plain form endpoint.
    pub async fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        let id = product.id.to_string();
        let quantity = quantity.to_string();
        let response = self
            .post_form(
                "/cart/add",
                &[("product_id", id.as_str()), ("quantity", quantity.as_str())],
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
    }

    /// Walk checkout from shipping through review with valid details.
    pub async fn complete_checkout_steps(&mut self) {
        let response = self
            .post_form(
                "/checkout/shipping",
                &[
                    ("line1", "12 Green Lane"),
                    ("line2", ""),
                    ("city", "Portland"),
                    ("state", "OR"),
                    ("postal_code", "97201"),
                    ("country", "US"),
                ],
            )
            .await;
        assert_eq!(response.location(), Some("/checkout"), "{}", response.body);

        let response = self
            .post_form(
                "/checkout/payment",
                &[
                    ("method", "card"),
                    ("card_number", "4242 4242 4242 4242"),
                    ("card_holder", "Maya Chen"),
                    ("expiry", "12/29"),
                    ("cvv", "123"),
                ],
            )
            .await;
        assert_eq!(response.location(), Some("/checkout"), "{}", response.body);
    }
}

fn form_request(uri: &str, fields: &[(&str, &str)], htmx: bool) -> Request<Body> {
    let body: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(body)).unwrap()
}
