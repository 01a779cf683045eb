//! # Error Types
//!
//! Domain-specific error types for tissu-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  tissu-core errors (this file)                                      │
//! │  ├── CatalogError     - fabric registry lookups                     │
//! │  ├── CartError        - cart ledger mutations                       │
//! │  └── ValidationError  - field-level input failures                  │
//! │                                                                     │
//! │  tissu-db errors (separate crate)                                   │
//! │  └── DbError          - database operation failures                 │
//! │                                                                     │
//! │  tissu-store errors (separate crate)                                │
//! │  └── StoreError       - what the caller-facing layer surfaces       │
//! │                                                                     │
//! │  Flow: ValidationError → CartError → StoreError → caller            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, field name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every condition is caller-recoverable; nothing here is fatal

use std::fmt;

use thiserror::Error;

// =============================================================================
// Catalog Error
// =============================================================================

/// Errors from fabric catalog lookups.
///
/// The registry is a constant table, so the only failure mode is asking
/// for a type key that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A lookup or validation referenced a type key absent from the registry.
    #[error("unknown fabric type: {0}")]
    UnknownFabricType(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation errors.
///
/// These occur when a candidate value does not meet a field invariant.
/// They are collected by [`CartError::InvalidLineItem`] at add-time and
/// also surfaced directly by the validators in [`crate::validation`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value is below the allowed minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: i64 },

    /// Numeric input was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Value is not in the allowed set for this field.
    #[error("{field} '{value}' is not one of: {}", allowed.join(", "))]
    NotAllowed {
        field: &'static str,
        value: String,
        allowed: Vec<String>,
    },

    /// Invalid format (e.g., malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl ValidationError {
    /// The name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Line Item Rejection
// =============================================================================

/// All field failures for one rejected cart candidate.
///
/// `Cart::add_line` validates every field before committing anything, so a
/// candidate with a bad price *and* a bad subtype reports both at once
/// instead of forcing the caller through one round-trip per mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRejection {
    failures: Vec<ValidationError>,
}

impl LineItemRejection {
    pub fn new(failures: Vec<ValidationError>) -> Self {
        debug_assert!(!failures.is_empty());
        LineItemRejection { failures }
    }

    /// The individual field failures, in field order.
    pub fn failures(&self) -> &[ValidationError] {
        &self.failures
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> Vec<&'static str> {
        self.failures.iter().map(ValidationError::field).collect()
    }
}

impl fmt::Display for LineItemRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Errors from cart ledger operations.
///
/// The ledger never partially mutates: every variant here means the cart
/// is exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CartError {
    /// A candidate line item failed one or more field invariants at add-time.
    #[error("invalid line item: {0}")]
    InvalidLineItem(LineItemRejection),

    /// An operation referenced a product id not present in the ledger.
    #[error("no cart line for product: {0}")]
    ItemNotFound(String),

    /// A quantity update violated the ≥ 1 unit, finite-positive constraint.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(ValidationError),
}

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_message() {
        let err = CatalogError::UnknownFabricType("velours".to_string());
        assert_eq!(err.to_string(), "unknown fabric type: velours");
    }

    #[test]
    fn validation_error_messages() {
        let err = ValidationError::MustBePositive { field: "unit_price" };
        assert_eq!(err.to_string(), "unit_price must be positive");

        let err = ValidationError::NotAllowed {
            field: "fabric_subtype",
            value: "Invalide".to_string(),
            allowed: vec!["Riche".to_string(), "Getzner".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "fabric_subtype 'Invalide' is not one of: Riche, Getzner"
        );
    }

    #[test]
    fn rejection_joins_failures_and_exposes_fields() {
        let rejection = LineItemRejection::new(vec![
            ValidationError::MustBePositive { field: "unit_price" },
            ValidationError::BelowMinimum {
                field: "quantity",
                min: 1,
            },
        ]);
        assert_eq!(rejection.fields(), vec!["unit_price", "quantity"]);

        let err = CartError::InvalidLineItem(rejection);
        assert_eq!(
            err.to_string(),
            "invalid line item: unit_price must be positive; quantity must be at least 1"
        );
    }
}
