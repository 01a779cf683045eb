//! # tissu-core: Pure Business Logic for the Tissu Storefront
//!
//! This crate is the domain heart of the storefront. It contains the fabric
//! catalog, the cart ledger, and all monetary arithmetic as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Tissu Architecture                              │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              Storefront / Back-office UI (external)         │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  tissu-store (services)                     │   │
//! │  │      sessions · checkout · admin operations                 │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │              ★ tissu-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────────┐      │   │
//! │  │  │ catalog │ │  cart   │ │  money  │ │  validation  │      │   │
//! │  │  │ fabrics │ │ ledger  │ │ + qty   │ │    rules     │      │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────────┘      │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 tissu-db (SQLite layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Fabric type registry (types, subtypes, units)
//! - [`cart`] - Cart ledger (line items, totals, mutations)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain records (Product, Order, Client, Quantity)
//! - [`validation`] - Field-level business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every operation is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Arithmetic**: cents for money, hundredths for quantities
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tissu_core::cart::{Cart, CartLine};
//! use tissu_core::catalog::{self, Unit};
//! use tissu_core::money::Money;
//! use tissu_core::types::Quantity;
//!
//! // The catalog knows which combinations are valid
//! assert!(catalog::is_valid_subtype("bazin", "Riche"));
//!
//! // The ledger validates at add-time and derives totals on every read
//! let mut cart = Cart::new();
//! cart.add_line(CartLine {
//!     product_id: "p1".into(),
//!     name: "Bazin Riche Or".into(),
//!     unit_price: Money::from_cents(1000),
//!     quantity: Quantity::from_units(3),
//!     fabric_type: "bazin".into(),
//!     fabric_subtype: "Riche".into(),
//!     unit: Unit::Meter,
//!     added_at: chrono::Utc::now(),
//! }).unwrap();
//! assert_eq!(cart.total(), Money::from_cents(3000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tissu_core::Money` instead of
// `use tissu_core::money::Money`.

pub use cart::{Cart, CartLine};
pub use catalog::{FabricTypeDef, Unit};
pub use error::{CartError, CatalogError, ValidationError};
pub use money::Money;
pub use types::{Client, Order, OrderItem, OrderStatus, Product, Quantity};
