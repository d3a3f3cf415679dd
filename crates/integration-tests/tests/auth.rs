//! Login, signup, logout and the profile pages behind them.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use ecotrade_integration_tests::TestApp;

#[tokio::test]
async fn test_login_page_renders() {
    let mut app = TestApp::new();
    let response = app.get("/login?next=/checkout").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"action="/login""#));
    assert!(response.body.contains("/checkout"));
}

#[tokio::test]
async fn test_blank_fields_are_rejected() {
    let mut app = TestApp::new();
    let response = app
        .post_form("/login", &[("email", "maya@example.com"), ("password", "")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please fill in all fields"));
    assert!(response.body.contains("maya@example.com"));
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let mut app = TestApp::new();
    let response = app
        .post_form("/signup", &[("email", "not-an-email"), ("password", "pw")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Invalid email address"));
}

#[tokio::test]
async fn test_signup_then_duplicate() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/signup",
            &[("email", "new.shopper@example.com"), ("password", "pw")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let mut other = app.fresh_browser();
    let response = other
        .post_form(
            "/signup",
            &[("email", "new.shopper@example.com"), ("password", "pw")],
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_to_next() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/login",
            &[
                ("email", "maya@example.com"),
                ("password", "pw"),
                ("next", "/leaderboard"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/leaderboard"));

    // Signed-in shoppers are sent away from the forms.
    let response = app.get("/login").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_offsite_next_is_ignored() {
    let mut app = TestApp::new();
    let response = app
        .post_form(
            "/login",
            &[
                ("email", "maya@example.com"),
                ("password", "pw"),
                ("next", "//evil.example"),
            ],
        )
        .await;
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let mut app = TestApp::new();
    app.sign_in("maya@example.com").await;
    let product = app.any_product().await;
    app.add_to_cart(&product, 2).await;

    let response = app.get("/").await;
    assert!(response.body.contains("Sign out"));

    let response = app.post_form("/logout", &[]).await;
    assert_eq!(response.location(), Some("/"));

    let response = app.get("/profile").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.get("/api/cart").await.json()["item_count"], 2);
}

#[tokio::test]
async fn test_profile_requires_login() {
    let mut app = TestApp::new();
    let response = app.get("/profile").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login?next=%2Fprofile"));

    let response = app.get("/profile?tab=orders").await;
    assert_eq!(
        response.location(),
        Some("/login?next=%2Fprofile%3Ftab%3Dorders")
    );
}

#[tokio::test]
async fn test_profile_tabs() {
    let mut app = TestApp::new();
    app.sign_in("maya@example.com").await;

    let response = app.get("/profile").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("maya@example.com"));
    assert!(response.body.contains("Eco Shopper"));

    let response = app.get("/profile?tab=impact").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("after your first order"));

    // Unknown tabs fall back to the overview.
    let response = app.get("/profile?tab=nonsense").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Eco Shopper"));
}

#[tokio::test]
async fn test_update_display_name() {
    let mut app = TestApp::new();
    app.sign_in("maya@example.com").await;

    let response = app
        .post_form("/profile/settings", &[("display_name", "  Maya Green ")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Profile updated"));
    assert!(response.body.contains("Maya Green"));

    let response = app
        .post_form("/profile/settings", &[("display_name", "   ")])
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("display name cannot be empty"));

    // The rename survives a fresh sign-in.
    let mut other = app.fresh_browser();
    other.sign_in("maya@example.com").await;
    let response = other.get("/profile?tab=settings").await;
    assert!(response.body.contains("Maya Green"));
}
