//! Multi-step checkout through to the order confirmation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use ecotrade_core::order::OrderPricing;
use ecotrade_integration_tests::TestApp;

#[tokio::test]
async fn test_empty_cart_redirects_to_cart() {
    let mut app = TestApp::new();
    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
}

#[tokio::test]
async fn test_shipping_validation_keeps_input() {
    let mut app = TestApp::new();
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;

    let response = app.get("/checkout").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Shipping Address"));

    let response = app
        .post_form(
            "/checkout/shipping",
            &[
                ("line1", "12 Green Lane"),
                ("city", ""),
                ("state", "OR"),
                ("postal_code", "97201"),
                ("country", "US"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("City is required"));
    assert!(response.body.contains("12 Green Lane"));
}

#[tokio::test]
async fn test_payment_validation_and_back() {
    let mut app = TestApp::new();
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;
    app.post_form(
        "/checkout/shipping",
        &[
            ("line1", "12 Green Lane"),
            ("city", "Portland"),
            ("state", "OR"),
            ("postal_code", "97201"),
        ],
    )
    .await;

    let response = app
        .post_form(
            "/checkout/payment",
            &[
                ("method", "card"),
                ("card_number", "4242"),
                ("card_holder", "Maya Chen"),
                ("expiry", "12/29"),
                ("cvv", "123"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Card number must be 16 digits"));

    let response = app.post_form("/checkout/back", &[]).await;
    assert_eq!(response.location(), Some("/checkout"));
    let response = app.get("/checkout").await;
    assert!(response.body.contains("Continue to Payment"));
    assert!(response.body.contains("Portland"));
}

#[tokio::test]
async fn test_guest_must_sign_in_to_place() {
    let mut app = TestApp::new();
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;
    app.complete_checkout_steps().await;

    let response = app.get("/checkout").await;
    assert!(response.body.contains("Review Your Order"));
    assert!(response.body.contains("Card ending in 4242"));

    let response = app.post_form("/checkout/place", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login?next=%2Fcheckout"));
}

#[tokio::test]
async fn test_place_order_end_to_end() {
    let mut app = TestApp::new();
    app.sign_in("checkout.tester@example.com").await;

    let catalog = app.catalog().await;
    let product = catalog.iter().find(|p| p.stock > 0).unwrap();
    app.add_to_cart(product, 2).await;
    app.complete_checkout_steps().await;

    let response = app.post_form("/checkout/place", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let confirmation = response.location().unwrap().to_string();
    assert!(confirmation.starts_with("/checkout/confirmation/"));

    let response = app.get(&confirmation).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Thank you for your order!"));

    let subtotal = product.price * 2;
    let total = OrderPricing::for_subtotal(subtotal).checkout_total();
    assert!(response.body.contains(&total.to_string()));

    // Cart and checkout progress are cleared.
    assert_eq!(app.get("/api/cart").await.json()["item_count"], 0);
    assert_eq!(app.get("/checkout").await.location(), Some("/cart"));

    // The order shows up on the profile and the buyer joins the leaderboard.
    let response = app.get("/profile?tab=orders").await;
    assert!(response.body.contains(&subtotal.to_string()));

    let board = app.get("/api/leaderboard").await.json();
    let me = board
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["display_name"] == "checkout.tester")
        .unwrap();
    assert_eq!(me["points"], OrderPricing::for_subtotal(subtotal).points_earned());
}

#[tokio::test]
async fn test_confirmation_is_private() {
    let mut app = TestApp::new();
    app.sign_in("maya@example.com").await;
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;
    app.complete_checkout_steps().await;
    let confirmation = app
        .post_form("/checkout/place", &[])
        .await
        .location()
        .unwrap()
        .to_string();

    let mut other = app.fresh_browser();
    let response = other.get(&confirmation).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.location().unwrap().starts_with("/login?next="));

    other.sign_in("oliver@example.com").await;
    let response = other.get(&confirmation).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_paypal_checkout() {
    let mut app = TestApp::new();
    app.sign_in("ana@example.com").await;
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;
    app.post_form(
        "/checkout/shipping",
        &[
            ("line1", "4 Harbour St"),
            ("city", "Sydney"),
            ("state", "NSW"),
            ("postal_code", "2000"),
            ("country", "AU"),
        ],
    )
    .await;
    app.post_form("/checkout/payment", &[("method", "paypal")])
        .await;

    let response = app.get("/checkout").await;
    assert!(response.body.contains("PayPal"));

    let response = app.post_form("/checkout/place", &[]).await;
    assert!(
        response
            .location()
            .unwrap()
            .starts_with("/checkout/confirmation/")
    );
}

#[tokio::test]
async fn test_rename_shows_on_leaderboard() {
    let mut app = TestApp::new();
    app.sign_in("rename.me@example.com").await;
    let product = app.any_product().await;
    app.add_to_cart(&product, 1).await;
    app.complete_checkout_steps().await;
    app.post_form("/checkout/place", &[]).await;

    let response = app
        .post_form("/profile/settings", &[("display_name", "Green Thumb")])
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let board = app.get("/api/leaderboard").await.json();
    let names: Vec<&str> = board
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["display_name"].as_str())
        .collect();
    assert!(names.contains(&"Green Thumb"));
    assert!(!names.contains(&"rename.me"));
}
