//! Integration tests for the HTTP API: catalog CRUD, order creation with
//! the full error taxonomy, and the committed-order view.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use till_db::{Database, DbConfig};
use till_server::{create_app, AppState};

async fn setup() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let app = create_app(AppState { db: db.clone() });
    (app, db)
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Creates a product through the API and returns its id.
async fn create_product(app: &Router, name: &str, price_cents: i64, stock: i64) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/products",
        Some(json!({ "name": name, "price_cents": price_cents, "stock_quantity": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed product failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (app, _db) = setup().await;

    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn product_crud_round_trip() {
    let (app, _db) = setup().await;

    let id = create_product(&app, "Coca-Cola 330ml", 199, 120).await;

    let (status, body) = request(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Coca-Cola 330ml");
    assert_eq!(listed[0]["price_cents"], 199);

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/products/{id}"),
        Some(json!({ "name": "Coca-Cola 500ml", "price_cents": 249, "stock_quantity": 90 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Coca-Cola 500ml");
    assert_eq!(body["stock_quantity"], 90);

    let (status, _) = request(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = request(&app, "GET", "/products", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_validation_is_rejected() {
    let (app, _db) = setup().await;

    for bad in [
        json!({ "name": "", "price_cents": 100, "stock_quantity": 1 }),
        json!({ "name": "Widget", "price_cents": -1, "stock_quantity": 1 }),
        json!({ "name": "Widget", "price_cents": 100, "stock_quantity": -5 }),
    ] {
        let (status, body) = request(&app, "POST", "/products", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation");
    }
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let (app, _db) = setup().await;

    let (status, body) = request(
        &app,
        "PUT",
        "/products/no-such-id",
        Some(json!({ "name": "Widget", "price_cents": 100, "stock_quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not-found");
}

#[tokio::test]
async fn create_order_returns_id_and_total() {
    let (app, _db) = setup().await;
    let product = create_product(&app, "Widget", 5, 10).await;

    let (status, body) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-1",
            "items": [{ "product_id": product, "quantity": 4 }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_cents"], 20);
    assert!(body["order_id"].as_str().is_some());

    // Stock was decremented durably.
    let (_, products) = request(&app, "GET", "/products", None).await;
    assert_eq!(products[0]["stock_quantity"], 6);
}

#[tokio::test]
async fn read_order_returns_ordered_items_with_product_names() {
    let (app, _db) = setup().await;
    let cola = create_product(&app, "Cola", 199, 50).await;
    let chips = create_product(&app, "Chips", 249, 50).await;

    let (_, created) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-1",
            "items": [
                { "product_id": chips, "quantity": 2 },
                { "product_id": cola, "quantity": 3 }
            ]
        })),
    )
    .await;
    let order_id = created["order_id"].as_str().unwrap();

    let (status, body) = request(&app, "GET", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], *order_id);
    assert_eq!(body["customer_id"], "cust-1");
    assert_eq!(body["total_cents"], 2 * 249 + 3 * 199);

    // Items preserve request order and carry the frozen amounts.
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_name"], "Chips");
    assert_eq!(items[0]["line_total_cents"], 498);
    assert_eq!(items[1]["product_name"], "Cola");
    assert_eq!(items[1]["line_total_cents"], 597);
}

#[tokio::test]
async fn read_missing_order_is_not_found() {
    let (app, _db) = setup().await;

    let (status, body) = request(&app, "GET", "/orders/no-such-order", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not-found");
}

#[tokio::test]
async fn order_for_unknown_product_is_not_found() {
    let (app, _db) = setup().await;

    let (status, body) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-1",
            "items": [{ "product_id": "no-such-product", "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not-found");
}

#[tokio::test]
async fn order_exceeding_stock_is_a_conflict() {
    let (app, _db) = setup().await;
    let product = create_product(&app, "Widget", 5, 10).await;

    let (status, _) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-1",
            "items": [{ "product_id": product, "quantity": 4 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-2",
            "items": [{ "product_id": product, "quantity": 8 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");

    // Stock stays at 6.
    let (_, products) = request(&app, "GET", "/products", None).await;
    assert_eq!(products[0]["stock_quantity"], 6);
}

#[tokio::test]
async fn order_validation_is_rejected_with_kind_validation() {
    let (app, _db) = setup().await;
    let product = create_product(&app, "Widget", 5, 10).await;

    for bad in [
        json!({ "customer_id": "", "items": [{ "product_id": product, "quantity": 1 }] }),
        json!({ "customer_id": "cust-1", "items": [] }),
        json!({ "customer_id": "cust-1", "items": [{ "product_id": product, "quantity": 0 }] }),
    ] {
        let (status, body) = request(&app, "POST", "/orders", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["kind"], "validation");
    }
}

#[tokio::test]
async fn deleting_a_sold_product_is_a_conflict() {
    let (app, _db) = setup().await;
    let product = create_product(&app, "Widget", 5, 10).await;

    let (status, _) = request(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "customer_id": "cust-1",
            "items": [{ "product_id": product, "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&app, "DELETE", &format!("/products/{product}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");
}
