//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Service layer                                                      │
//! │       │  db.products().get_by_id(id)                                │
//! │       ▼                                                             │
//! │  ProductRepository / OrderRepository / ClientRepository             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite                                                             │
//! │                                                                     │
//! │  SQL stays isolated in this module; everything above works with     │
//! │  the typed records from tissu-core.                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - product CRUD, search, stock deltas
//! - [`order::OrderRepository`] - order creation and status writes
//! - [`client::ClientRepository`] - back-office client records

pub mod client;
pub mod order;
pub mod product;
