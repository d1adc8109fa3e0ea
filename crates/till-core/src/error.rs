//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  till-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  till-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── CheckoutError    - Transaction engine failures                 │
//! │                                                                     │
//! │  apps/server                                                        │
//! │  └── ApiError         - What clients see (kind + message)           │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impls)
//! 2. Include context in error messages (product id, quantities)
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested product does not exist.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// Also raised when the guarded stock decrement affects zero rows, i.e.
    /// a concurrent transaction consumed the stock between read and write.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// A line total or running order total overflowed i64 cents.
    #[error("order amount overflow for product {product_id}")]
    AmountOverflow { product_id: String },

    /// Input validation failure (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any database session opens and therefore never
/// have storage side effects.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Collection exceeds its allowed size.
    #[error("{field} cannot contain more than {max} entries")]
    TooMany { field: String, max: usize },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
