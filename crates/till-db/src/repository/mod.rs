//! # Repository Module
//!
//! Database repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                       │
//! │       │  db.products().get_by_id(id)                                │
//! │       ▼                                                             │
//! │  ProductRepository / OrderRepository                                │
//! │       │  SQL query                                                  │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! │                                                                     │
//! │  Benefits: SQL isolated in one place, clean separation, easy to     │
//! │  exercise against an in-memory database in tests.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog CRUD
//! - [`order::OrderRepository`] - committed-order reads and display views
//! - [`stock`] - session-scoped stock reservation used by the checkout
//!   engine (not a pool-owning repository: it runs inside an open
//!   transaction)

pub mod order;
pub mod product;
pub(crate) mod stock;
