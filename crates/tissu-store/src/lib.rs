//! # tissu-store: Service Layer for the Tissu Storefront
//!
//! Orchestrates the pure domain logic of `tissu-core` and the persistence
//! layer of `tissu-db` into the operations the storefront exposes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Caller (HTTP handler, CLI, test)                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                 tissu-store (THIS CRATE)                      │ │
//! │  │                                                               │ │
//! │  │  ShopService      browsing + cart editing                     │ │
//! │  │  CheckoutService  cart → persisted order                      │ │
//! │  │  AdminService     products, clients, fulfillment              │ │
//! │  │  CartSessions     per-session lock boundary around the cart   │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │       │                         │                                   │
//! │       ▼                         ▼                                   │
//! │  tissu-core (pure)         tissu-db (SQLite)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use tissu_db::{Database, DbConfig};
//! use tissu_store::{CartSessions, CheckoutService, ShopService};
//!
//! let db = Database::new(DbConfig::new("./data/tissu.db")).await?;
//! let sessions = Arc::new(CartSessions::new());
//!
//! let shop = ShopService::new(db.clone(), Arc::clone(&sessions));
//! shop.add_to_cart("session-1", &product_id, quantity).await?;
//!
//! let checkout = CheckoutService::new(db, sessions);
//! let receipt = checkout.place_order("session-1", &client_id, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod admin;
pub mod checkout;
pub mod error;
pub mod session;
pub mod shop;

// =============================================================================
// Re-exports
// =============================================================================

pub use admin::{AdminService, ClientInput, ProductInput};
pub use checkout::{CheckoutReceipt, CheckoutService, OrderView};
pub use error::{StoreError, StoreResult};
pub use session::CartSessions;
pub use shop::{CartLineView, CartView, ShopService};
