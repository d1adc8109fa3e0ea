//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Product     │   │     Order      │   │   OrderLine    │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │      │
//! │  │  name          │   │  customer_id   │   │  order_id (FK) │      │
//! │  │  price_cents   │   │  total_cents   │   │  product_id    │      │
//! │  │  stock_qty     │   │  created_at    │   │  line_total    │      │
//! │  └────────────────┘   └────────────────┘   └────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An `Order` and its `OrderLine`s are created together, atomically, at
//! checkout and never mutated afterward. `Product.stock_quantity` mutates
//! repeatedly over the product's life via successive reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Stock and price are owned by the catalog; checkout mutates stock only
/// through the guarded reservation decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Current stock level. Invariant: never negative after any committed
    /// transaction.
    pub stock_quantity: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity can currently be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// A committed customer order.
///
/// `total_cents` is authoritative only once the order is committed; during
/// checkout the header briefly holds 0 inside the open transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as a Money value.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product/quantity entry within an order.
///
/// Uses the snapshot pattern: the unit price and line total are frozen at
/// time of sale and never recomputed from the catalog, so later price
/// changes leave order history intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    /// Reference to the product, not ownership of it.
    pub product_id: String,
    /// Position within the order, preserving request order.
    pub line_no: i64,
    /// Quantity sold. Always > 0.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// unit price × quantity, computed once at time of sale (frozen).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Returns the frozen line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            price_cents: 500,
            stock_quantity: stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_sell() {
        assert!(product(10).can_sell(10));
        assert!(product(10).can_sell(1));
        assert!(!product(10).can_sell(11));
        assert!(!product(0).can_sell(1));
    }

    #[test]
    fn test_price_as_money() {
        assert_eq!(product(1).price(), Money::from_cents(500));
    }
}
