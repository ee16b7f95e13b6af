//! End-to-end API integration tests
//!
//! These tests drive the full router over in-memory adapters and verify:
//! - Registration, login, session and logout flows
//! - Response envelopes and error statuses
//! - Bearer authentication on product endpoints
//! - Pagination parameters and product lookups

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

use common::{numbered_products, Harness};
use stockdesk_api::api::router;
use stockdesk_api::domain::product::Product;

/// Setup test application over a fresh harness
fn setup_app(harness: &Harness) -> Router {
    router(harness.app_state())
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn register_payload(email: &str) -> Value {
    json!({
        "email": email,
        "password": "secret1",
        "firstName": "Jan",
        "lastName": "Kowalski",
        "companyName": "ABC",
        "companyAddress": "Długa 1, Gdańsk"
    })
}

/// Registers a user and returns its access token
async fn register(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", &register_payload(email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_register_user() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            &register_payload("a@b.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["error"].is_null());
    assert!(json["data"]["access_token"].is_string());
    assert_eq!(json["data"]["user"]["email"], "a@b.com");
    assert_eq!(json["data"]["user"]["profile"]["first_name"], "Jan");
    assert_eq!(json["data"]["user"]["company"]["name"], "ABC");
    assert_eq!(
        json["data"]["user"]["company"]["address"],
        "Długa 1, Gdańsk"
    );

    // Verify persistence
    assert_eq!(harness.company_names().await, vec!["ABC".to_string()]);
    assert_eq!(harness.events.events().await.len(), 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    let payload = json!({
        "email": "not-an-email",
        "password": "123",
        "firstName": "",
        "lastName": "Kowalski",
        "companyName": " "
    });

    let response = app
        .oneshot(json_request("POST", "/api/auth/register", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert!(json["fields"]["email"].is_string());
    assert!(json["fields"]["password"].is_string());
    assert!(json["fields"]["firstName"].is_string());
    assert!(json["fields"]["companyName"].is_string());
    assert!(json["fields"]["lastName"].is_null());

    // Nothing was provisioned
    assert!(harness.company_names().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    register(&app, "a@b.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            &register_payload("a@b.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("duplicate"));

    // The second company was rolled back
    assert_eq!(harness.company_names().await.len(), 1);
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": "a@b.com", "password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(!json["data"]["access_token"].as_str().unwrap().is_empty());
    assert_eq!(json["data"]["user"]["company"]["name"], "ABC");

    // Wrong password
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": "a@b.com", "password": "wrong-pass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid login credentials");
}

#[tokio::test]
async fn test_session_and_logout() {
    let harness = Harness::new();
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/auth/session", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["email"], "a@b.com");

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/auth/logout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let response = app
        .oneshot(authed_request("GET", "/api/auth/session", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    let harness = Harness::new();
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(authed_request("POST", "/api/auth/refresh", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let fresh = json["data"]["access_token"].as_str().unwrap().to_string();
    assert_ne!(fresh, token);

    let response = app
        .oneshot(authed_request("GET", "/api/products", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_profile() {
    let harness = Harness::new();
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/auth/profile")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    json!({ "lastName": "Nowak", "companyName": "ABC Sp. z o.o." }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["profile"]["first_name"], "Jan");
    assert_eq!(json["data"]["profile"]["last_name"], "Nowak");
    assert_eq!(json["data"]["company"]["name"], "ABC Sp. z o.o.");
}

#[tokio::test]
async fn test_products_require_authentication() {
    let harness = Harness::with_products(numbered_products(3));
    let app = setup_app(&harness);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);

    let response = app
        .oneshot(authed_request("GET", "/api/products/stock", "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_paginated_products() {
    let harness = Harness::with_products(numbered_products(25));
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/products?page=3&limit=10", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    let json = body_json(response).await;
    assert_eq!(json["count"], 25);
    assert_eq!(json["page"], 3);
    assert_eq!(json["limit"], 10);
    assert_eq!(json["data"].as_array().unwrap().len(), 5);

    // Defaults
    let response = app
        .oneshot(authed_request("GET", "/api/products", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_invalid_pagination_is_rejected() {
    let harness = Harness::with_products(numbered_products(5));
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    for uri in ["/api/products?limit=101", "/api/products?page=0"] {
        let response = app
            .clone()
            .oneshot(authed_request("GET", uri, &token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_products_with_stock_and_stats() {
    let harness = Harness::with_products(numbered_products(6));
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(authed_request(
            "GET",
            "/api/products/stock?status=low_stock",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows
        .iter()
        .all(|row| row["availability_status"] == "low_stock"));

    let response = app
        .oneshot(authed_request("GET", "/api/products/stats", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 6);
    assert_eq!(json["data"]["out_of_stock"], 1);
    assert_eq!(json["data"]["available"], 2);
}

#[tokio::test]
async fn test_get_product_by_sku() {
    let harness = Harness::with_products(numbered_products(3));
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/products/sku/SKU-02", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Product 02");
    assert_eq!(json["data"]["buildable_units"], 6);

    let response = app
        .oneshot(authed_request("GET", "/api/products/sku/NOPE", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_register_with_missing_fields_uses_envelope() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            &json!({ "email": "a@b.com", "password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert_eq!(json["fields"]["companyName"], "Company name is required");
    assert_eq!(json["fields"]["firstName"], "First name is required");
}

#[tokio::test]
async fn test_malformed_json_uses_envelope() {
    let harness = Harness::new();
    let app = setup_app(&harness);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from("{\"email\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_page_uses_envelope() {
    let harness = Harness::with_products(numbered_products(3));
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    let response = app
        .oneshot(authed_request("GET", "/api/products?page=abc", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to deserialize query string"));
}

#[tokio::test]
async fn test_route_names_are_valid_skus() {
    let harness = Harness::with_products(vec![
        Product::new("stock", "Stock pot", 4).unwrap(),
        Product::new("stats", "Stats board", 40).unwrap(),
    ]);
    let app = setup_app(&harness);
    let token = register(&app, "a@b.com").await;

    for (sku, name) in [("stock", "Stock pot"), ("stats", "Stats board")] {
        let response = app
            .clone()
            .oneshot(authed_request("GET", &format!("/api/products/sku/{}", sku), &token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{}", sku);
        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], name);
    }

    let response = app
        .oneshot(authed_request("GET", "/api/products/stats", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
}
