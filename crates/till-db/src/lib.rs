//! # till-db: Database Layer for Till
//!
//! This crate provides database access for the order/billing backend. It
//! uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                             │
//! │                                                                     │
//! │  HTTP handler (POST /orders)                                        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                    till-db (THIS CRATE)                       │  │
//! │  │                                                               │  │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌────────────────────┐    │  │
//! │  │  │  Database  │  │ Repositories │  │      Checkout      │    │  │
//! │  │  │ (pool.rs)  │  │ (repository) │  │   (checkout.rs)    │    │  │
//! │  │  │            │  │              │  │                    │    │  │
//! │  │  │ SqlitePool │◄─│ ProductRepo  │  │ one transaction:   │    │  │
//! │  │  │ WAL mode   │  │ OrderRepo    │  │ header → reserve   │    │  │
//! │  │  │ migrations │  │ stock ops    │  │ lines → total →    │    │  │
//! │  │  │            │  │              │  │ commit / rollback  │    │  │
//! │  │  └────────────┘  └──────────────┘  └────────────────────┘    │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (or :memory: in tests)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, order, stock)
//! - [`checkout`] - The transactional order-creation engine

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use checkout::{Checkout, CheckoutError, NewOrder, NewOrderLine, PlacedOrder};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::{OrderDetails, OrderRepository};
pub use repository::product::ProductRepository;
