//! # Checkout Engine
//!
//! Turns a customer's requested line items into a committed order: one
//! SQLite transaction that verifies stock, freezes prices, persists the
//! order header and lines, decrements inventory, and writes the grand
//! total. All of it lands together, or none of it does.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       place_order(new_order)                        │
//! │                                                                     │
//! │  validate input ── reject BEFORE any transaction opens              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN                                                              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  INSERT order header (total_cents = 0)   ← first statement is a     │
//! │       │                                    write: takes the WAL     │
//! │       │                                    writer lock, so          │
//! │       │                                    concurrent checkouts     │
//! │       │                                    queue instead of racing  │
//! │       ▼                                                             │
//! │  for each line, strictly in input order:                            │
//! │     read price+stock ─ missing? ────────────────┐                   │
//! │     short? ─────────────────────────────────────┤                   │
//! │     guarded decrement (AND stock >= qty) ─ 0 rows? ─┤               │
//! │     INSERT order_lines row (frozen price, frozen total)             │
//! │       │                                         │                   │
//! │       ▼                                         ▼                   │
//! │  UPDATE header with accumulated total       ROLLBACK                │
//! │       │                                         │                   │
//! │       ▼                                         ▼                   │
//! │  COMMIT ──► { order_id, total_cents }       typed error             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sequencing matters: two lines for the same product must not both pass a
//! stale stock check, so each line's read-then-decrement runs only after
//! the previous line's decrement is applied inside this same transaction.
//! Nothing here is parallel on purpose.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::stock;
use till_core::{validation, CoreError, OrderDraft};

// =============================================================================
// Request / Result Types
// =============================================================================

/// A requested order: who is buying and what.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub lines: Vec<NewOrderLine>,
}

/// One requested line: which product and how many.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: String,
    pub quantity: i64,
}

/// The durable outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: String,
    pub total_cents: i64,
}

// =============================================================================
// Errors
// =============================================================================

/// Checkout failures.
///
/// Every variant other than `RollbackFailed` is surfaced only after the
/// transaction has been rolled back, so callers can treat any error as
/// "no durable effects".
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Business rule violation (unknown product, insufficient stock,
    /// invalid input, amount overflow).
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Storage failure (connection, query, commit).
    #[error(transparent)]
    Db(#[from] DbError),

    /// The rollback triggered by another failure itself failed.
    ///
    /// Reported distinctly instead of silently subsuming it under the
    /// trigger: the session's state is now unknown to the caller.
    #[error("rollback failed ({rollback}) while handling: {trigger}")]
    RollbackFailed {
        trigger: Box<CheckoutError>,
        rollback: DbError,
    },
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Db(DbError::from(err))
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The transactional order-creation engine.
///
/// One `place_order` call = one transaction = one connection from the pool.
/// Nothing outlives the call: no background tasks, no locks held after
/// return on any path.
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new checkout engine on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Places an order atomically.
    ///
    /// ## Success
    /// Durably creates one order row, N line rows, and N stock decrements,
    /// and returns the order id with the grand total.
    ///
    /// ## Failure
    /// Leaves zero durable effects. Input validation is rejected before a
    /// transaction even opens; everything after that rolls back as a unit.
    pub async fn place_order(&self, order: &NewOrder) -> Result<PlacedOrder, CheckoutError> {
        validate(order)?;

        debug!(
            customer_id = %order.customer_id,
            lines = order.lines.len(),
            "starting checkout"
        );

        let mut tx: Transaction<'_, Sqlite> = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match place_order_in_tx(&mut tx, order).await {
            Ok(placed) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(
                    order_id = %placed.order_id,
                    total_cents = placed.total_cents,
                    lines = order.lines.len(),
                    "order committed"
                );
                Ok(placed)
            }
            Err(err) => {
                debug!(error = %err, "rolling back checkout");
                match tx.rollback().await {
                    Ok(()) => Err(err),
                    Err(rb) => {
                        let rollback = DbError::from(rb);
                        warn!(trigger = %err, error = %rollback, "rollback failed");
                        Err(CheckoutError::RollbackFailed {
                            trigger: Box::new(err),
                            rollback,
                        })
                    }
                }
            }
        }
    }
}

/// Precondition checks. Runs before any transaction opens, so rejected
/// requests have no storage side effects at all.
fn validate(order: &NewOrder) -> Result<(), CoreError> {
    validation::validate_customer_id(&order.customer_id)?;
    validation::validate_line_count(order.lines.len())?;
    for line in &order.lines {
        validation::validate_quantity(line.quantity)?;
    }
    Ok(())
}

/// The body of the checkout transaction. Any error propagated from here is
/// answered with a rollback by the caller.
async fn place_order_in_tx(
    conn: &mut SqliteConnection,
    order: &NewOrder,
) -> Result<PlacedOrder, CheckoutError> {
    let order_id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    let customer_id = order.customer_id.trim();

    // Header first, with a placeholder total. Also the statement that takes
    // the writer lock (see module docs).
    sqlx::query(
        r#"
        INSERT INTO orders (id, customer_id, total_cents, created_at)
        VALUES (?1, ?2, 0, ?3)
        "#,
    )
    .bind(&order_id)
    .bind(customer_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let mut draft = OrderDraft::new(customer_id);

    for (line_no, line) in order.lines.iter().enumerate() {
        // Reservation verifies and decrements stock; the returned price is
        // the unit price frozen for this sale.
        let unit_price = stock::reserve(&mut *conn, &line.product_id, line.quantity).await?;

        let line_total = draft.add_line(&line.product_id, line.quantity, unit_price)?;

        sqlx::query(
            r#"
            INSERT INTO order_lines
                (id, order_id, product_id, line_no, quantity,
                 unit_price_cents, line_total_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&order_id)
        .bind(&line.product_id)
        .bind(line_no as i64)
        .bind(line.quantity)
        .bind(unit_price.cents())
        .bind(line_total.cents())
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }

    // All lines reserved; the draft's running total becomes authoritative.
    sqlx::query("UPDATE orders SET total_cents = ?2 WHERE id = ?1")
        .bind(&order_id)
        .bind(draft.total().cents())
        .execute(&mut *conn)
        .await?;

    Ok(PlacedOrder {
        order_id,
        total_cents: draft.total().cents(),
    })
}
