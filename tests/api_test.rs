//! Integration tests for API endpoints.
//!
//! These tests drive the real router over an in-memory SQLite database, so
//! every request goes through the authorization guard, the services and the
//! SeaORM stores.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use sweet_shop_api::config::Config;
use sweet_shop_api::infra::Database;
use sweet_shop_api::{create_router, AppState};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// Helpers
// =============================================================================

async fn app() -> Router {
    let config = Config::new("sqlite::memory:", SECRET).unwrap();
    let db = Arc::new(Database::connect(&config).await.unwrap());
    create_router(AppState::from_config(db, &config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(app: &Router, username: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_item(app: &Router, admin: &str, name: &str, price: f64, quantity: i32) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/items",
        Some(admin),
        Some(json!({
            "name": name,
            "category": "other",
            "price": price,
            "quantity": quantity,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn names(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Health & Routing
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/items/{id}/purchase"].is_object());
    assert!(body["paths"]["/items/{id}/restock"]["post"].is_object());
    assert!(body["paths"]["/items/{id}"]["put"].is_object());
    assert!(body["paths"]["/items/{id}"]["delete"].is_object());
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_register_returns_account_and_token() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "mithai",
            "email": "Mithai@Example.com",
            "password": "secret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["account"]["email"], "mithai@example.com");
    assert_eq!(data["account"]["role"], "user");
    assert!(data["account"].get("passwordHash").is_none());
    assert_eq!(data["tokenType"], "Bearer");
    assert_eq!(data["expiresIn"], 86_400);
    assert!(!body.to_string().contains("secret123"));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = app().await;
    register(&app, "barfi", "user").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "barfi2",
            "email": "BARFI@example.com",
            "password": "secret123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_ACCOUNT");
}

#[tokio::test]
async fn test_register_validation() {
    let app = app().await;

    let cases = [
        json!({"username": "ab", "email": "ab@example.com", "password": "secret123"}),
        json!({"username": "abc", "email": "not-an-email", "password": "secret123"}),
        json!({"username": "abc", "email": "abc@example.com", "password": "12345"}),
        json!({"username": "abc", "email": "abc@example.com", "password": "secret123", "role": "root"}),
    ];

    for case in cases {
        let (status, body) =
            send(&app, Method::POST, "/auth/register", None, Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_register_trims_email_before_validating() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "rasgulla",
            "email": "  Rasgulla@Example.COM ",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["account"]["email"], "rasgulla@example.com");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": " rasgulla@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_email_case_insensitive_password_case_sensitive() {
    let app = app().await;
    register(&app, "kulfi", "user").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "KULFI@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["account"]["username"], "kulfi");
    assert!(body["data"]["token"].is_string());

    let (status, wrong_password) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "kulfi@example.com", "password": "SECRET123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["code"], "INVALID_CREDENTIALS");

    let (status, unknown_email) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "ghost@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, wrong_password);
}

// =============================================================================
// Authorization Guard
// =============================================================================

#[tokio::test]
async fn test_items_require_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/items", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = send(&app, Method::GET, "/items", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn test_user_token_forbidden_on_admin_routes() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let user = register(&app, "shopper", "user").await;
    let id = create_item(&app, &admin, "Ladoo", 15.0, 5).await;

    let attempts = [
        (Method::POST, "/items".to_string(), Some(json!({"name": ""}))),
        (Method::PUT, format!("/items/{}", id), Some(json!({"price": -1}))),
        (Method::DELETE, format!("/items/{}", id), None),
        (Method::POST, format!("/items/{}/restock", id), Some(json!({"quantity": 5}))),
        (Method::PUT, "/items/not-a-uuid".to_string(), None),
    ];

    for (method, uri, body) in attempts {
        let (status, response) = send(&app, method.clone(), &uri, Some(user.as_str()), body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response["code"], "FORBIDDEN");
    }

    // Nothing changed
    let (_, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(user.as_str()), None).await;
    assert_eq!(body["data"]["item"]["quantity"], 5);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_create_item_validation() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;

    let cases = [
        json!({"name": "Ladoo", "category": "Indian", "price": 1.0, "quantity": 1}),
        json!({"name": "Ladoo", "category": "other", "price": -1.0, "quantity": 1}),
        json!({"name": "Ladoo", "category": "other", "price": 1.0, "quantity": -1}),
        json!({"name": "   ", "category": "other", "price": 1.0, "quantity": 1}),
        json!({"category": "other", "price": 1.0, "quantity": 1}),
    ];

    for case in cases {
        let (status, body) = send(&app, Method::POST, "/items", Some(admin.as_str()), Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_list_is_newest_first_with_count() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;

    for name in ["Barfi", "Jalebi", "Peda"] {
        create_item(&app, &admin, name, 5.0, 1).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = send(&app, Method::GET, "/items", Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(names(&body), vec!["Peda", "Jalebi", "Barfi"]);
}

#[tokio::test]
async fn test_search_filters() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let user = register(&app, "shopper", "user").await;

    for (name, price) in [("Cheap Toffee", 5.0), ("Ten Rupee Barfi", 10.0), ("Kaju Katli", 20.0), ("Gold Leaf", 25.0)] {
        create_item(&app, &admin, name, price, 1).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/items/search?minPrice=10&maxPrice=20",
        Some(user.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Kaju Katli", "Ten Rupee Barfi"]);

    let (_, body) = send(&app, Method::GET, "/items/search?name=KATLI", Some(user.as_str()), None).await;
    assert_eq!(names(&body), vec!["Kaju Katli"]);

    let (_, body) = send(&app, Method::GET, "/items/search?category=Indian", Some(user.as_str()), None).await;
    assert_eq!(body["count"], 0);

    let (_, body) = send(&app, Method::GET, "/items/search?minPrice=abc", Some(user.as_str()), None).await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn test_get_update_delete_item() {
    let app = app().await;
    let admin = register(&app, "halwai", "admin").await;
    let id = create_item(&app, &admin, "Rasgulla", 12.0, 9).await;

    let (status, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["creator"]["username"], "halwai");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/items/{}", id),
        Some(admin.as_str()),
        Some(json!({"price": 14.5, "imageUrl": "https://example.com/rasgulla.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 14.5);
    assert_eq!(body["data"]["name"], "Rasgulla");
    assert_eq!(body["data"]["quantity"], 9);

    let (status, _) = send(&app, Method::DELETE, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_item_id() {
    let app = app().await;
    let user = register(&app, "shopper", "user").await;

    let (status, body) = send(&app, Method::POST, "/items/42/purchase", Some(user.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Stock Ledger
// =============================================================================

#[tokio::test]
async fn test_ladoo_purchase_and_restock_scenario() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let user = register(&app, "shopper", "user").await;
    let id = create_item(&app, &admin, "Ladoo", 15.0, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/purchase", id),
        Some(user.as_str()),
        Some(json!({"quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 3);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/purchase", id),
        Some(user.as_str()),
        Some(json!({"quantity": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (_, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(user.as_str()), None).await;
    assert_eq!(body["data"]["item"]["quantity"], 3);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/restock", id),
        Some(admin.as_str()),
        Some(json!({"quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 8);
}

#[tokio::test]
async fn test_purchase_defaults_to_one_unit() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let id = create_item(&app, &admin, "Peda", 8.0, 2).await;

    let (status, body) = send(&app, Method::POST, &format!("/items/{}/purchase", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/purchase", id),
        Some(admin.as_str()),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["quantity"], 0);

    let (status, body) = send(&app, Method::POST, &format!("/items/{}/purchase", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn test_invalid_stock_quantities() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let id = create_item(&app, &admin, "Jalebi", 5.0, 3).await;

    for quantity in [json!(0), json!(-2), json!("lots"), json!(1.5)] {
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/items/{}/purchase", id),
            Some(admin.as_str()),
            Some(json!({ "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", quantity);
        assert_eq!(body["code"], "INVALID_QUANTITY");
    }

    let (status, body) = send(&app, Method::POST, &format!("/items/{}/restock", id), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUANTITY");

    let (_, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(body["data"]["item"]["quantity"], 3);
}

#[tokio::test]
async fn test_purchase_beyond_any_stock_level() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let id = create_item(&app, &admin, "Barfi", 6.0, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/purchase", id),
        Some(admin.as_str()),
        Some(json!({"quantity": 3_000_000_000_i64})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/items/{}/restock", id),
        Some(admin.as_str()),
        Some(json!({"quantity": 3_000_000_000_i64})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUANTITY");

    let (_, body) = send(&app, Method::GET, &format!("/items/{}", id), Some(admin.as_str()), None).await;
    assert_eq!(body["data"]["item"]["quantity"], 5);
}

#[tokio::test]
async fn test_stock_operations_on_missing_item() {
    let app = app().await;
    let admin = register(&app, "admin", "admin").await;
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, Method::POST, &format!("/items/{}/purchase", missing), Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/items/{}/restock", missing),
        Some(admin.as_str()),
        Some(json!({"quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
