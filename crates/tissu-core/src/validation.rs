//! # Validation Module
//!
//! Reusable field validators for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Caller / form layer (external)                            │
//! │  └── basic format checks, immediate feedback                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - domain rule validation                      │
//! │  └── invoked by the cart ledger at add-time and by the admin        │
//! │      services before any product write                              │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / UNIQUE / FOREIGN KEY constraints                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::catalog::{self, Unit};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Quantity;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name",
            max: 200,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use tissu_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required { field: "id" });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id",
        reason: "must be a valid UUID",
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// Must be strictly positive. Unlike generic retail systems, a zero-priced
/// fabric line is always a data entry mistake here.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive { field: "unit_price" });
    }

    Ok(())
}

/// Validates a purchase quantity.
///
/// ## Rules
/// Must be at least one whole unit of measure. The core imposes no upper
/// bound; stock sufficiency is a caller-side concern.
pub fn validate_quantity(quantity: Quantity) -> ValidationResult<()> {
    if !quantity.is_orderable() {
        return Err(ValidationError::BelowMinimum {
            field: "quantity",
            min: 1,
        });
    }

    Ok(())
}

// =============================================================================
// Fabric Metadata Validators
// =============================================================================

/// Validates a fabric type key against the catalog registry.
pub fn validate_fabric_type(type_key: &str) -> ValidationResult<()> {
    if !catalog::is_valid_type(type_key) {
        return Err(ValidationError::NotAllowed {
            field: "fabric_type",
            value: type_key.to_string(),
            allowed: catalog::list_types().map(str::to_string).collect(),
        });
    }

    Ok(())
}

/// Validates a subtype within its fabric type.
///
/// An unknown `type_key` fails on the subtype field with an empty allowed
/// list; callers validating the full combination report the type failure
/// separately via [`validate_fabric_type`].
pub fn validate_fabric_subtype(type_key: &str, subtype: &str) -> ValidationResult<()> {
    if !catalog::is_valid_subtype(type_key, subtype) {
        let allowed = catalog::definition(type_key)
            .map(|def| def.subtypes.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();
        return Err(ValidationError::NotAllowed {
            field: "fabric_subtype",
            value: subtype.to_string(),
            allowed,
        });
    }

    Ok(())
}

/// Validates a unit choice within its fabric type.
pub fn validate_unit_choice(type_key: &str, unit: Unit) -> ValidationResult<()> {
    let allowed = match catalog::definition(type_key) {
        Ok(def) if def.allows_unit(unit) => return Ok(()),
        Ok(def) => def.units.iter().map(|u| u.to_string()).collect(),
        Err(_) => Vec::new(),
    };

    Err(ValidationError::NotAllowed {
        field: "unit",
        value: unit.to_string(),
        allowed,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
