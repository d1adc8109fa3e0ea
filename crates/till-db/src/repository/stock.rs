//! # Stock Reservation
//!
//! Session-scoped read-check-decrement for one order line. Runs inside the
//! checkout transaction; never call it on a bare pool connection.
//!
//! ## Why a guarded decrement?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ Read stock, then blind decrement:                               │
//! │     two transactions can both read stock=5, both decrement 4,       │
//! │     and stock goes to -3.                                           │
//! │                                                                     │
//! │  ✅ Decrement with the check in the WHERE clause:                   │
//! │     UPDATE products SET stock_quantity = stock_quantity - ?qty      │
//! │     WHERE id = ?id AND stock_quantity >= ?qty                       │
//! │                                                                     │
//! │     0 rows affected == someone got there first. The read above      │
//! │     only decides the error message; the UPDATE decides the truth.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Under WAL the checkout transaction already holds the writer lock when
//! this runs, so the guard is a second line of defense rather than the
//! primary one. The schema's CHECK constraint is the third.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::checkout::CheckoutError;
use till_core::{CoreError, Money};

/// Reserves `quantity` units of a product for the current transaction:
/// verifies availability, decrements stock, and returns the unit price
/// observed at this moment: the price frozen into the order line.
///
/// ## Errors
/// - [`CoreError::ProductNotFound`] if the product does not exist
/// - [`CoreError::InsufficientStock`] if fewer than `quantity` units remain
pub(crate) async fn reserve(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> Result<Money, CheckoutError> {
    let row: Option<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT price_cents, stock_quantity
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let (price_cents, available) = row.ok_or_else(|| {
        CheckoutError::Domain(CoreError::ProductNotFound(product_id.to_string()))
    })?;

    if available < quantity {
        return Err(CheckoutError::Domain(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested: quantity,
        }));
    }

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_quantity = stock_quantity - ?2,
            updated_at = ?3
        WHERE id = ?1 AND stock_quantity >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(chrono::Utc::now())
    .execute(&mut *conn)
    .await?;

    // The guard lost a race we should not be able to lose while holding the
    // writer lock; report it as the conflict it is either way.
    if result.rows_affected() == 0 {
        return Err(CheckoutError::Domain(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested: quantity,
        }));
    }

    debug!(product_id = %product_id, quantity, remaining = available - quantity, "stock reserved");

    Ok(Money::from_cents(price_cents))
}
