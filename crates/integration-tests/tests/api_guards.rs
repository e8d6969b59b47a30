//! Auth gate and boundary validation behavior over the real router.
//!
//! Every request here is rejected before the API would touch the database,
//! so the tests run without one.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use copper_lily_core::UserRole;
use copper_lily_integration_tests::{
    bare_request, bearer, body_json, expired_bearer, json_request, test_app,
};

// =============================================================================
// Auth Gate
// =============================================================================

#[tokio::test]
async fn test_order_list_requires_credential() {
    let response = test_app()
        .oneshot(bare_request("GET", "/api/orders", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_order_list_requires_admin_role() {
    let auth = bearer(7, UserRole::User);
    let response = test_app()
        .oneshot(bare_request("GET", "/api/orders", Some(&auth)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn test_garbage_credential_is_rejected() {
    let response = test_app()
        .oneshot(bare_request(
            "GET",
            "/api/orders",
            Some("Bearer not-a-real-token"),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid credential");
}

#[tokio::test]
async fn test_expired_credential_is_rejected() {
    let auth = expired_bearer(1, UserRole::Admin);
    let response = test_app()
        .oneshot(bare_request("GET", "/api/orders", Some(&auth)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Credential expired");
}

#[tokio::test]
async fn test_product_delete_requires_admin() {
    let auth = bearer(7, UserRole::User);
    let response = test_app()
        .oneshot(bare_request("DELETE", "/api/products/1", Some(&auth)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_analytics_requires_admin() {
    let response = test_app()
        .oneshot(bare_request("GET", "/api/admin/analytics?range=week", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Cart Ownership
// =============================================================================

#[tokio::test]
async fn test_cart_read_is_owner_scoped() {
    let auth = bearer(9, UserRole::User);
    let response = test_app()
        .oneshot(bare_request("GET", "/api/cart/7", Some(&auth)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "You do not have access to this resource");
}

#[tokio::test]
async fn test_user_orders_are_owner_scoped() {
    let auth = bearer(9, UserRole::User);
    let response = test_app()
        .oneshot(bare_request("GET", "/api/orders/user/7", Some(&auth)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Boundary Validation
// =============================================================================

fn product_body(features: &[&str]) -> serde_json::Value {
    json!({
        "name": "Silk Scarf",
        "price": "120.00",
        "category": "accessories",
        "stock": 5,
        "features": features,
    })
}

#[tokio::test]
async fn test_product_create_rejects_two_features() {
    let auth = bearer(1, UserRole::Admin);
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&auth),
            &product_body(&["soft", "light"]),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "At least 3 features required");
}

#[tokio::test]
async fn test_product_create_checks_auth_before_body() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            None,
            &product_body(&["soft", "light"]),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_checkout_rejects_empty_items() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            None,
            &json!({
                "items": [],
                "total": "0",
                "idempotencyKey": uuid::Uuid::new_v4(),
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Order must contain at least one item");
}

#[tokio::test]
async fn test_checkout_rejects_zero_quantity() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            None,
            &json!({
                "items": [{ "productId": 1, "quantity": 0, "price": "10.00" }],
                "total": "10.00",
                "idempotencyKey": uuid::Uuid::new_v4(),
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Quantity must be at least 1");
}

#[tokio::test]
async fn test_checkout_rejects_missing_idempotency_key() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            None,
            &json!({
                "items": [{ "productId": 1, "quantity": 1, "price": "10.00" }],
                "total": "10.00",
            }),
        ))
        .await
        .expect("response");

    // Serde rejects the body before the handler runs
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_promo_create_rejects_blank_code() {
    let auth = bearer(1, UserRole::Admin);
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/api/promocodes",
            Some(&auth),
            &json!({ "code": "", "discount": "10" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Promo code is required");
}
