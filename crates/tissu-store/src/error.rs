//! # Store Error Types
//!
//! The error surface of the service layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CartError / ValidationError / CatalogError   (tissu-core)          │
//! │  DbError                                      (tissu-db)            │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← one type for every service call        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use tissu_core::{CartError, CatalogError, ValidationError};
use tissu_db::DbError;

/// Service-layer errors surfaced to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart ledger operation failed (bad line item, absent product id).
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A fabric catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A field failed validation outside of a cart operation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A database operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Checkout was attempted on an empty cart.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,

    /// Checkout referenced an unknown or deactivated client.
    #[error("unknown client: {0}")]
    UnknownClient(String),

    /// A service call referenced an unknown product.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Checkout requested more of a product than is on hand.
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: String,
        available: i64,
    },
}

/// Result type for service-layer operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_messages() {
        let err: StoreError = CatalogError::UnknownFabricType("velours".to_string()).into();
        assert_eq!(err.to_string(), "unknown fabric type: velours");

        let err: StoreError = CartError::ItemNotFound("p1".to_string()).into();
        assert_eq!(err.to_string(), "no cart line for product: p1");
    }

    #[test]
    fn empty_cart_message() {
        assert_eq!(
            StoreError::EmptyCart.to_string(),
            "cannot place an order from an empty cart"
        );
    }
}
