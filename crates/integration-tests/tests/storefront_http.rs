//! HTTP-level tests for routes that do not need a database.

use axum::http::{Method, StatusCode};
use serde_json::json;

use clearsight_integration_tests::{ADMIN_EMAIL, TestApp, json_body, line, user};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/health", None, None).await;
    let generated = response.headers().get("x-request-id");
    assert!(generated.is_some_and(|v| v.len() == 36));
}

#[tokio::test]
async fn test_empty_cart_for_new_visitor() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/cart", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["total"], "0");
    assert_eq!(body["total_display"], "₹0");
}

#[tokio::test]
async fn test_cart_shows_persisted_lines_and_totals() {
    let app = TestApp::new();
    let cookie = app
        .session_with(
            &[line("p1", "Aviator", 1500, 3), line("p2", "Wayfarer", 2500, 1)],
            None,
        )
        .await;

    let body = json_body(app.send(Method::GET, "/api/cart", None, Some(&cookie)).await).await;

    assert_eq!(body["item_count"], 4);
    assert_eq!(body["total"], "7000");
    assert_eq!(body["total_display"], "₹7,000");
    assert_eq!(body["items"][0]["id"], "p1");
    assert_eq!(body["items"][0]["line_total"], "4500");
    assert_eq!(body["items"][0]["price_display"], "₹1,500");
    assert_eq!(body["items"][1]["id"], "p2");

    let count = json_body(
        app.send(Method::GET, "/api/cart/count", None, Some(&cookie))
            .await,
    )
    .await;
    assert_eq!(count["item_count"], 4);
}

#[tokio::test]
async fn test_update_quantity_persists_across_requests() {
    let app = TestApp::new();
    let cookie = app
        .session_with(&[line("p1", "Aviator", 1500, 3)], None)
        .await;

    let body = json_body(
        app.send(
            Method::PATCH,
            "/api/cart/items/p1",
            Some(json!({ "quantity": 5 })),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert_eq!(body["item_count"], 5);
    assert_eq!(body["total"], "7500");

    let reloaded = json_body(app.send(Method::GET, "/api/cart", None, Some(&cookie)).await).await;
    assert_eq!(reloaded["items"][0]["quantity"], 5);
    assert_eq!(reloaded["total"], "7500");
}

#[tokio::test]
async fn test_zero_and_negative_quantity_remove_the_line() {
    let app = TestApp::new();
    let cookie = app
        .session_with(
            &[line("p1", "Aviator", 1500, 3), line("p2", "Wayfarer", 2500, 1)],
            None,
        )
        .await;

    let body = json_body(
        app.send(
            Method::PATCH,
            "/api/cart/items/p2",
            Some(json!({ "quantity": 0 })),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["total"], "4500");

    let body = json_body(
        app.send(
            Method::PATCH,
            "/api/cart/items/p1",
            Some(json!({ "quantity": -1 })),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["item_count"], 0);
}

#[tokio::test]
async fn test_unknown_id_is_a_no_op() {
    let app = TestApp::new();
    let cookie = app
        .session_with(&[line("p1", "Aviator", 1500, 2)], None)
        .await;

    let body = json_body(
        app.send(
            Method::PATCH,
            "/api/cart/items/nope",
            Some(json!({ "quantity": 4 })),
            Some(&cookie),
        )
        .await,
    )
    .await;
    assert_eq!(body["item_count"], 2);

    let response = app
        .send(Method::DELETE, "/api/cart/items/nope", None, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["item_count"], 2);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::new();
    let cookie = app
        .session_with(
            &[line("p1", "Aviator", 1500, 1), line("p2", "Wayfarer", 2500, 2)],
            None,
        )
        .await;

    let body = json_body(
        app.send(Method::DELETE, "/api/cart/items/p1", None, Some(&cookie))
            .await,
    )
    .await;
    assert_eq!(body["items"][0]["id"], "p2");
    assert_eq!(body["total"], "5000");

    let body = json_body(app.send(Method::DELETE, "/api/cart", None, Some(&cookie)).await).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], "0");
}

#[tokio::test]
async fn test_checkout_requires_login() {
    let app = TestApp::new();
    let cookie = app
        .session_with(&[line("p1", "Aviator", 1500, 1)], None)
        .await;

    let response = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!({ "phone": "9876543210", "address": "12 MG Road, Bengaluru" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let app = TestApp::new();
    let shopper = user("u1", "shopper@example.com");
    let cookie = app.session_with(&[], Some(&shopper)).await;

    let response = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!({ "phone": "9876543210", "address": "12 MG Road, Bengaluru" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "your cart is empty");
}

#[tokio::test]
async fn test_invalid_checkout_keeps_cart() {
    let app = TestApp::new();
    let shopper = user("u1", "shopper@example.com");
    let cookie = app
        .session_with(&[line("p1", "Aviator", 1500, 2)], Some(&shopper))
        .await;

    let response = app
        .send(
            Method::POST,
            "/api/checkout",
            Some(json!({ "phone": "12345", "address": "12 MG Road, Bengaluru" })),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let cart = json_body(app.send(Method::GET, "/api/cart", None, Some(&cookie)).await).await;
    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["total"], "3000");
}

#[tokio::test]
async fn test_me_reports_admin_flag() {
    let app = TestApp::new();

    let anonymous = json_body(app.send(Method::GET, "/api/auth/me", None, None).await).await;
    assert_eq!(anonymous["user"], serde_json::Value::Null);
    assert_eq!(anonymous["is_admin"], false);

    let admin = user("u9", ADMIN_EMAIL);
    let cookie = app.session_with(&[], Some(&admin)).await;
    let me = json_body(app.send(Method::GET, "/api/auth/me", None, Some(&cookie)).await).await;
    assert_eq!(me["user"]["email"], ADMIN_EMAIL);
    assert_eq!(me["is_admin"], true);
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new();

    let response = app
        .send(Method::GET, "/api/admin/dashboard", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let shopper = user("u1", "shopper@example.com");
    let cookie = app.session_with(&[], Some(&shopper)).await;
    let response = app
        .send(Method::GET, "/api/admin/orders", None, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let app = TestApp::new();
    let shopper = user("u1", "shopper@example.com");
    let cookie = app
        .session_with(&[line("p1", "Aviator", 1500, 1)], Some(&shopper))
        .await;

    let response = app
        .send(Method::POST, "/api/auth/logout", None, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = json_body(app.send(Method::GET, "/api/auth/me", None, Some(&cookie)).await).await;
    assert_eq!(me["user"], serde_json::Value::Null);
    let cart = json_body(app.send(Method::GET, "/api/cart", None, Some(&cookie)).await).await;
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn test_invalid_price_filter_is_rejected() {
    let app = TestApp::new();
    let response = app
        .send(Method::GET, "/api/products?price=cheap", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
