//! End-to-end tests through the HTTP router against an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vanledger_db::{Database, DbConfig};
use vanledger_server::{router, AppState, ServerConfig};

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(db, &ServerConfig::default()).unwrap();
    router(state)
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
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers an account and returns its session token.
async fn register(app: &Router, phone: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Ravi", "phone": phone, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_shop(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/shops",
        Some(token),
        Some(json!({ "name": name, "area": "Market Road" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, token: &str, name: &str, price: i64, stock: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/products",
        Some(token),
        Some(json!({ "name": name, "unit": "packet", "price": price, "stock": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = app().await;
    register(&app, "9800000001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "phone": "9800000001", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["phone"], "9800000001");
    assert_eq!(me["id"], body["user"]["id"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "phone": "9800000001", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_duplicate_phone_conflicts() {
    let app = app().await;
    register(&app, "9800000001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Other", "phone": "9800000001", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/shops", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/summary", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_crud() {
    let app = app().await;
    let token = register(&app, "9800000001").await;

    create_shop(&app, &token, "Lakshmi Stores").await;
    create_product(&app, &token, "Milk", 3000, 10).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(&token),
        Some(json!({ "name": "MILK", "unit": "packet", "price": 3000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(&token),
        Some(json!({ "name": "Curd", "unit": "cup", "price": -5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, shops) = send(&app, Method::GET, "/shops", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shops.as_array().unwrap().len(), 1);
    assert_eq!(shops[0]["pendingBalance"], 0);
}

#[tokio::test]
async fn test_shop_and_product_are_patched() {
    let app = app().await;
    let token = register(&app, "9800000001").await;
    let shop_id = create_shop(&app, &token, "Lakshmi Stores").await;
    let milk = create_product(&app, &token, "Milk", 3000, 10).await;

    let shop_uri = format!("/shops/{shop_id}");
    let (status, shop) = send(
        &app,
        Method::PATCH,
        &shop_uri,
        Some(&token),
        Some(json!({ "name": "Lakshmi General Stores" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{shop}");
    assert_eq!(shop["name"], "Lakshmi General Stores");
    assert_eq!(shop["area"], "Market Road");

    let (status, product) = send(
        &app,
        Method::PATCH,
        &format!("/products/{milk}"),
        Some(&token),
        Some(json!({ "price": 3200 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{product}");
    assert_eq!(product["price"], 3200);
    assert_eq!(product["stock"], 10);

    let (status, _) = send(
        &app,
        Method::PUT,
        &shop_uri,
        Some(&token),
        Some(json!({ "name": "Replaced" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = app().await;
    let token = register(&app, "9800000001").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/shops",
        Some(&token),
        Some(json!({ "area": "no name" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_sale_payment_and_summary() {
    let app = app().await;
    let token = register(&app, "9800000001").await;
    let shop_id = create_shop(&app, &token, "Lakshmi Stores").await;
    let milk = create_product(&app, &token, "Milk", 3000, 10).await;

    // 2 × ₹30 = ₹60, ₹20 paid in cash, ₹40 on credit
    let (status, sale) = send(
        &app,
        Method::POST,
        "/sales",
        Some(&token),
        Some(json!({
            "shopId": shop_id,
            "items": [{ "productId": milk, "quantity": 2, "price": 3000 }],
            "amountPaid": 2000,
            "paymentType": "cash"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{sale}");
    assert_eq!(sale["totalAmount"], 6000);

    let (_, shop) = send(&app, Method::GET, &format!("/shops/{shop_id}"), Some(&token), None).await;
    assert_eq!(shop["pendingBalance"], 4000);

    let (_, product) = send(&app, Method::GET, &format!("/products/{milk}"), Some(&token), None).await;
    assert_eq!(product["stock"], 8);

    let (status, _) = send(
        &app,
        Method::POST,
        "/payments",
        Some(&token),
        Some(json!({ "shopId": shop_id, "amount": 1500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(&token),
        Some(json!({ "description": "Diesel", "amount": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, summary) = send(&app, Method::GET, "/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["cashTotal"], 2000);
    assert_eq!(summary["creditTotal"], 4000);
    assert_eq!(summary["revenue"], 6000);
    assert_eq!(summary["expenseTotal"], 500);
    assert_eq!(summary["oldCreditRecovered"], 1500);
    assert_eq!(summary["netProfit"], 5500);
    assert_eq!(summary["cashExpected"], 3000);
    assert_eq!(summary["totalPendingCredits"], 2500);

    let (status, sales) = send(
        &app,
        Method::GET,
        &format!("/sales?shopId={shop_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 1);
    assert_eq!(sales[0]["shopName"], "Lakshmi Stores");
    assert_eq!(sales[0]["items"][0]["productName"], "Milk");
}

#[tokio::test]
async fn test_order_lifecycle() {
    let app = app().await;
    let token = register(&app, "9800000001").await;
    let shop_id = create_shop(&app, &token, "Lakshmi Stores").await;
    let bread = create_product(&app, &token, "Bread", 4000, 20).await;

    let (status, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&token),
        Some(json!({
            "shopId": shop_id,
            "items": [{ "productId": bread, "quantity": 5, "price": 4000 }],
            "deliveryDate": "2026-03-10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "pending");
    let order_uri = format!("/orders/{}", order["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &order_uri,
        Some(&token),
        Some(json!({ "status": "delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, transition) = send(
        &app,
        Method::PATCH,
        &order_uri,
        Some(&token),
        Some(json!({
            "status": "delivered",
            "paymentInfo": { "amountPaid": 20000, "paymentType": "upi" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{transition}");
    assert_eq!(transition["order"]["status"], "delivered");
    assert_eq!(transition["sale"]["totalAmount"], 20000);
    assert_eq!(transition["sale"]["paymentType"], "upi");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &order_uri,
        Some(&token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, product) = send(&app, Method::GET, &format!("/products/{bread}"), Some(&token), None).await;
    assert_eq!(product["stock"], 15);

    let (status, orders) = send(
        &app,
        Method::GET,
        "/orders?status=delivered&startDate=2026-03-10",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tenants_cannot_see_each_other() {
    let app = app().await;
    let owner = register(&app, "9800000001").await;
    let intruder = register(&app, "9800000002").await;
    let shop_id = create_shop(&app, &owner, "Lakshmi Stores").await;

    let uri = format!("/shops/{shop_id}");
    let (status, body) = send(&app, Method::GET, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, shops) = send(&app, Method::GET, "/shops", Some(&intruder), None).await;
    assert!(shops.as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}
