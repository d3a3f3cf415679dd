//! Administrator JSON API and the public leaderboard.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use ecotrade_integration_tests::{ADMIN_EMAIL, TestApp};
use serde_json::json;

fn new_product() -> serde_json::Value {
    json!({
        "name": "Bamboo Toothbrush Set",
        "description": "Four compostable toothbrushes.",
        "price": "12.00",
        "images": [],
        "category": "Accessories",
        "carbon_footprint": "0.4",
        "materials": ["Bamboo"],
        "sustainability_score": 92,
        "stock": 40
    })
}

#[tokio::test]
async fn test_admin_api_requires_admin() {
    let mut app = TestApp::new();
    let body = new_product();

    let response = app
        .json(Method::POST, "/api/admin/products", Some(&body))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    app.sign_in("maya@example.com").await;
    let response = app
        .json(Method::POST, "/api/admin/products", Some(&body))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let mut app = TestApp::new();
    app.sign_in(ADMIN_EMAIL).await;
    let before = app.catalog().await.len();

    let response = app
        .json(Method::POST, "/api/admin/products", Some(&new_product()))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let created = response.json();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(app.catalog().await.len(), before + 1);

    let uri = format!("/api/admin/products/{id}");
    let response = app
        .json(Method::PATCH, &uri, Some(&json!({ "stock": 5 })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["stock"], 5);
    assert_eq!(response.json()["name"], "Bamboo Toothbrush Set");

    let response = app.get(&format!("/products/{id}")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Bamboo Toothbrush Set"));

    let response = app.json(Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.get(&format!("/api/products/{id}")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.json(Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_product_is_rejected() {
    let mut app = TestApp::new();
    app.sign_in(ADMIN_EMAIL).await;

    let mut body = new_product();
    body["name"] = json!("  ");
    let response = app
        .json(Method::POST, "/api/admin/products", Some(&body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());

    let product = app.any_product().await;
    let uri = format!("/api/admin/products/{}", product.id);
    let response = app
        .json(Method::PATCH, &uri, Some(&json!({ "price": "-1.00" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .json(Method::PATCH, &uri, Some(&json!({ "price": "5000000000.00" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // The catalog still prices normally afterwards.
    let response = app.get("/products?sort=price-desc").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_order_status_update() {
    let mut shopper = TestApp::new();
    shopper.sign_in("maya@example.com").await;
    let product = shopper.any_product().await;
    shopper.add_to_cart(&product, 1).await;
    shopper.complete_checkout_steps().await;
    let location = shopper
        .post_form("/checkout/place", &[])
        .await
        .location()
        .unwrap()
        .to_string();
    let order_id = location.rsplit('/').next().unwrap().to_string();

    let mut admin = shopper.fresh_browser();
    admin.sign_in(ADMIN_EMAIL).await;
    let response = admin
        .json(
            Method::PATCH,
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.json()["status"], "shipped");

    let response = shopper.get(&location).await;
    assert!(response.body.contains("Shipped"));
}

#[tokio::test]
async fn test_leaderboard_page() {
    let mut app = TestApp::new();
    let response = app.get("/leaderboard").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Community Leaderboard"));
    assert!(response.body.contains("1st Place"));

    let board = app.get("/api/leaderboard").await.json();
    let entries = board.as_array().unwrap();
    assert!(!entries.is_empty());
    assert_eq!(entries.first().unwrap()["rank"], 1);
    let points: Vec<u64> = entries
        .iter()
        .map(|e| e["points"].as_u64().unwrap())
        .collect();
    assert!(points.windows(2).all(|w| w[0] >= w[1]));
}
