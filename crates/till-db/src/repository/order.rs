//! # Order Repository
//!
//! Read side for committed orders: raw rows for invariant checks and the
//! denormalized display view (customer name, product names, frozen line
//! totals). Writes happen only inside the checkout transaction; there is
//! deliberately no way to mutate an order from here.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use till_core::{Order, OrderLine};

/// Repository for committed-order reads.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order header by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, customer_id, total_cents, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order's raw lines, in the order they were requested.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT id, order_id, product_id, line_no, quantity,
                   unit_price_cents, line_total_cents, created_at
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Fetches the display view of a committed order: header joined with
    /// the customer name, and lines joined with product names.
    ///
    /// The customer join is a LEFT JOIN on purpose: orders store a
    /// free-form customer id and an unknown customer simply has no name.
    /// Line amounts come straight from the frozen columns; nothing is
    /// recomputed from the catalog.
    pub async fn details(&self, order_id: &str) -> DbResult<Option<OrderDetails>> {
        let header = sqlx::query_as::<_, OrderHeaderView>(
            r#"
            SELECT o.id, o.customer_id, c.name AS customer_name,
                   o.total_cents, o.created_at
            FROM orders o
            LEFT JOIN customers c ON c.id = o.customer_id
            WHERE o.id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, OrderLineView>(
            r#"
            SELECT l.id, l.product_id, p.name AS product_name,
                   l.quantity, l.unit_price_cents, l.line_total_cents
            FROM order_lines l
            INNER JOIN products p ON p.id = l.product_id
            WHERE l.order_id = ?1
            ORDER BY l.line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(OrderDetails { header, lines }))
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Order header joined with the customer name.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderHeaderView {
    pub id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// One order line joined with its product name.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderLineView {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

/// The denormalized display view of one committed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub header: OrderHeaderView,
    pub lines: Vec<OrderLineView>,
}
