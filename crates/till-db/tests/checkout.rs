//! Integration tests for the checkout engine: frozen totals, all-or-nothing
//! rollback, and the stock invariant under sequential and concurrent orders.

use chrono::Utc;
use std::path::PathBuf;
use till_core::{CoreError, Product};
use till_db::{CheckoutError, Database, DbConfig, NewOrder, NewOrderLine};
use uuid::Uuid;

async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn add_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> String {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        price_cents,
        stock_quantity: stock,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product.id
}

fn order(customer_id: &str, lines: &[(&str, i64)]) -> NewOrder {
    NewOrder {
        customer_id: customer_id.to_string(),
        lines: lines
            .iter()
            .map(|(product_id, quantity)| NewOrderLine {
                product_id: (*product_id).to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

async fn stock_of(db: &Database, product_id: &str) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}

async fn count(db: &Database, table: &str) -> i64 {
    // Table names come from this test file only.
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}

fn is_insufficient_stock(err: &CheckoutError) -> bool {
    matches!(
        err,
        CheckoutError::Domain(CoreError::InsufficientStock { .. })
    )
}

#[tokio::test]
async fn successful_order_freezes_prices_and_decrements_stock() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 5, 10).await;

    let placed = db
        .checkout()
        .place_order(&order("cust-1", &[(&product, 4)]))
        .await
        .unwrap();

    assert_eq!(placed.total_cents, 20);
    assert_eq!(stock_of(&db, &product).await, 6);

    let header = db.orders().get_by_id(&placed.order_id).await.unwrap().unwrap();
    assert_eq!(header.customer_id, "cust-1");
    assert_eq!(header.total_cents, 20);

    let lines = db.orders().get_lines(&placed.order_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 4);
    assert_eq!(lines[0].unit_price_cents, 5);
    assert_eq!(lines[0].line_total_cents, 20);
}

#[tokio::test]
async fn header_total_equals_sum_of_line_totals() {
    let db = memory_db().await;
    let a = add_product(&db, "Apples", 199, 50).await;
    let b = add_product(&db, "Bananas", 89, 50).await;

    let placed = db
        .checkout()
        .place_order(&order("cust-1", &[(&a, 3), (&b, 7), (&a, 1)]))
        .await
        .unwrap();

    let header = db.orders().get_by_id(&placed.order_id).await.unwrap().unwrap();
    let lines = db.orders().get_lines(&placed.order_id).await.unwrap();

    let sum: i64 = lines.iter().map(|l| l.line_total_cents).sum();
    assert_eq!(header.total_cents, sum);
    assert_eq!(header.total_cents, 3 * 199 + 7 * 89 + 199);

    // Lines come back in request order.
    let products: Vec<&str> = lines.iter().map(|l| l.product_id.as_str()).collect();
    assert_eq!(products, vec![a.as_str(), b.as_str(), a.as_str()]);
}

#[tokio::test]
async fn insufficient_stock_is_a_conflict_and_changes_nothing() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 5, 10).await;

    // First order drains stock to 6.
    db.checkout()
        .place_order(&order("cust-1", &[(&product, 4)]))
        .await
        .unwrap();

    // 8 > 6: rejected, stock untouched.
    let err = db
        .checkout()
        .place_order(&order("cust-2", &[(&product, 8)]))
        .await
        .unwrap_err();

    match err {
        CheckoutError::Domain(CoreError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 6);
            assert_eq!(requested, 8);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(stock_of(&db, &product).await, 6);
    assert_eq!(count(&db, "orders").await, 1);
    assert_eq!(count(&db, "order_lines").await, 1);
}

#[tokio::test]
async fn failed_line_rolls_back_the_entire_order() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 100, 10).await;

    // First line is valid; second references a product that doesn't exist.
    let err = db
        .checkout()
        .place_order(&order("cust-1", &[(&product, 3), ("no-such-product", 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Domain(CoreError::ProductNotFound(_))
    ));

    // The first line's decrement was reverted; no header or line rows exist.
    assert_eq!(stock_of(&db, &product).await, 10);
    assert_eq!(count(&db, "orders").await, 0);
    assert_eq!(count(&db, "order_lines").await, 0);
}

#[tokio::test]
async fn second_line_for_same_product_sees_first_lines_decrement() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 10, 10).await;

    // 6 + 5 > 10: the second line must observe the first reservation and
    // fail, and the whole order must vanish.
    let err = db
        .checkout()
        .place_order(&order("cust-1", &[(&product, 6), (&product, 5)]))
        .await
        .unwrap_err();

    match err {
        CheckoutError::Domain(CoreError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 4);
            assert_eq!(requested, 5);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(stock_of(&db, &product).await, 10);

    // 6 + 4 = 10 fits exactly.
    let placed = db
        .checkout()
        .place_order(&order("cust-1", &[(&product, 6), (&product, 4)]))
        .await
        .unwrap();
    assert_eq!(placed.total_cents, 100);
    assert_eq!(stock_of(&db, &product).await, 0);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_touching_storage() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 5, 10).await;

    let cases = vec![
        order("", &[(&product, 1)]),
        order("   ", &[(&product, 1)]),
        order("cust-1", &[]),
        order("cust-1", &[(&product, 0)]),
        order("cust-1", &[(&product, -3)]),
        order("cust-1", &[(&product, 1000)]),
    ];

    for case in cases {
        let err = db.checkout().place_order(&case).await.unwrap_err();
        assert!(
            matches!(err, CheckoutError::Domain(CoreError::Validation(_))),
            "expected validation error, got {err:?}"
        );
    }

    assert_eq!(count(&db, "orders").await, 0);
    assert_eq!(stock_of(&db, &product).await, 10);
}

#[tokio::test]
async fn committed_order_reads_identically_twice() {
    let db = memory_db().await;
    let product = add_product(&db, "Widget", 250, 10).await;

    let placed = db
        .checkout()
        .place_order(&order("cust-1", &[(&product, 2)]))
        .await
        .unwrap();

    let first = db.orders().details(&placed.order_id).await.unwrap().unwrap();
    let second = db.orders().details(&placed.order_id).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.lines.len(), 1);
    assert_eq!(first.lines[0].product_name, "Widget");
    assert_eq!(first.header.total_cents, 500);
    // No customer row exists for this id; the view degrades to no name.
    assert_eq!(first.header.customer_name, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_orders_for_the_same_stock_yield_one_conflict() {
    // A file-backed database so the two checkouts really run on separate
    // connections; :memory: pools are capped at one connection.
    let path: PathBuf =
        std::env::temp_dir().join(format!("till-checkout-{}.db", Uuid::new_v4()));
    let db = Database::new(DbConfig::new(&path).max_connections(4))
        .await
        .unwrap();

    let product = add_product(&db, "Widget", 5, 10).await;

    // Each order alone fits (7 <= 10); together they exceed stock (14 > 10).
    let first = db.checkout();
    let second = db.checkout();
    let order_a = order("cust-a", &[(&product, 7)]);
    let order_b = order("cust-b", &[(&product, 7)]);

    let (res_a, res_b) = tokio::join!(
        first.place_order(&order_a),
        second.place_order(&order_b)
    );

    let successes = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one order must win: {res_a:?} / {res_b:?}");

    let loser = if res_a.is_err() {
        res_a.unwrap_err()
    } else {
        res_b.unwrap_err()
    };
    assert!(
        is_insufficient_stock(&loser),
        "loser must see a stock conflict, got {loser:?}"
    );

    let remaining = stock_of(&db, &product).await;
    assert_eq!(remaining, 3);
    assert!(remaining >= 0);
    assert_eq!(count(&db, "orders").await, 1);

    db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
