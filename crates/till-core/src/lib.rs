//! # till-core: Pure Business Logic for Till
//!
//! This crate is the heart of the order/billing backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Till Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                    HTTP API (apps/server)                     │ │
//! │  │    POST /orders, GET /orders/{id}, catalog CRUD, /health      │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │               ★ till-core (THIS CRATE) ★                      │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌────────────┐   │ │
//! │  │   │   types   │ │   money   │ │   order   │ │ validation │   │ │
//! │  │   │  Product  │ │   Money   │ │OrderDraft │ │   rules    │   │ │
//! │  │   │   Order   │ │ cents i64 │ │ run. total│ │   checks   │   │ │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └────────────┘   │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                 till-db (Database Layer)                      │ │
//! │  │        SQLite queries, migrations, checkout engine            │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderLine)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - The order-draft aggregate used during checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{DraftLine, OrderDraft};
pub use types::{Order, OrderLine, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway requests and keeps a checkout transaction short-lived.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity for a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum length of a customer id accepted on an order.
pub const MAX_CUSTOMER_ID_LEN: usize = 64;
