//! # Validation Module
//!
//! Input validation for order and catalog requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: HTTP handler (deserialization, types)                     │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation, runs BEFORE a     │
//! │           database transaction opens, so a rejected request has     │
//! │           zero storage side effects                                 │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: SQLite constraints (NOT NULL, CHECK, foreign keys)        │
//! │                                                                     │
//! │  Defense in depth: each layer catches different mistakes            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CUSTOMER_ID_LEN, MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Order Input Validators
// =============================================================================

/// Validates a customer id attached to an order.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most [`MAX_CUSTOMER_ID_LEN`] characters
///
/// Customer ids are opaque references; existence is not checked (the order
/// view degrades to a nameless customer, like the original lookup join).
pub fn validate_customer_id(customer_id: &str) -> ValidationResult<()> {
    let customer_id = customer_id.trim();

    if customer_id.is_empty() {
        return Err(ValidationError::Required {
            field: "customer_id".to_string(),
        });
    }

    if customer_id.len() > MAX_CUSTOMER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "customer_id".to_string(),
            max: MAX_CUSTOMER_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a requested line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of lines in an order request.
///
/// ## Rules
/// - At least one line
/// - At most [`MAX_ORDER_LINES`]
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if count > MAX_ORDER_LINES {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_ORDER_LINES,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Input Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock quantity supplied through the catalog endpoints.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock_quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
