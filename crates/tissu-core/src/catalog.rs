//! # Fabric Catalog Model
//!
//! Single source of truth for which fabric types, subtypes, and measurement
//! units exist, and for validating combinations of the three.
//!
//! ## Why a Constant Table?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The fabric taxonomy changes at deployment time, not at runtime.    │
//! │                                                                     │
//! │  Representing it as a compile-time constant table:                  │
//! │  • makes every lookup allocation-free                               │
//! │  • makes unsynchronized concurrent reads safe by construction       │
//! │  • removes the "type exists but has zero subtypes" class of bugs    │
//! │    (the invariants are checked once, in tests, over the table)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tissu_core::catalog;
//!
//! assert!(catalog::is_valid_subtype("bazin", "Riche"));
//! let unit = catalog::default_unit_for("bazin").unwrap();
//! assert_eq!(unit.as_str(), "meter");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

// =============================================================================
// Measurement Unit
// =============================================================================

/// Measurement basis for pricing and quantity.
///
/// A closed set: fabric is sold either by the meter or by the roll.
/// Which units a given fabric type allows is part of its registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Sold by length, supports fractional quantities (2.50 m).
    Meter,
    /// Sold as a whole roll.
    Roll,
}

impl Unit {
    /// The canonical token used in catalog entries and stored records.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Meter => "meter",
            Unit::Roll => "roll",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Fabric Type Definition
// =============================================================================

/// One registered fabric type: its allowed subtypes and units.
///
/// Entries are `'static` and immutable; the registry below is the only
/// place they are constructed.
#[derive(Debug, PartialEq, Eq)]
pub struct FabricTypeDef {
    /// Unique identifier, the canonical catalog key (e.g. "bazin").
    pub key: &'static str,

    /// Human-readable label for display.
    pub display_name: &'static str,

    /// Allowed subtype labels, ordered, never empty.
    pub subtypes: &'static [&'static str],

    /// Allowed measurement units, ordered, never empty.
    pub units: &'static [Unit],

    /// Unit preselected in forms; always a member of `units`.
    pub default_unit: Unit,
}

impl FabricTypeDef {
    /// Whether `subtype` is an allowed subtype of this fabric type.
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.contains(&subtype)
    }

    /// Whether this fabric type may be sold in `unit`.
    pub fn allows_unit(&self, unit: Unit) -> bool {
        self.units.contains(&unit)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// The fabric registry. Append-only across releases; never mutated at runtime.
static REGISTRY: &[FabricTypeDef] = &[
    FabricTypeDef {
        key: "bazin",
        display_name: "Bazin",
        subtypes: &["Riche", "Getzner", "Brodé"],
        units: &[Unit::Meter],
        default_unit: Unit::Meter,
    },
    FabricTypeDef {
        key: "wax",
        display_name: "Wax",
        subtypes: &["Hollandais", "Hitarget", "Java"],
        units: &[Unit::Meter, Unit::Roll],
        default_unit: Unit::Meter,
    },
    FabricTypeDef {
        key: "dentelle",
        display_name: "Dentelle",
        subtypes: &["Suisse", "Cornely", "Tulle"],
        units: &[Unit::Meter, Unit::Roll],
        default_unit: Unit::Meter,
    },
    FabricTypeDef {
        key: "soie",
        display_name: "Soie",
        subtypes: &["Naturelle", "Satinée"],
        units: &[Unit::Meter],
        default_unit: Unit::Meter,
    },
    FabricTypeDef {
        key: "coton",
        display_name: "Coton",
        subtypes: &["Pagne tissé", "Percale"],
        units: &[Unit::Meter, Unit::Roll],
        default_unit: Unit::Roll,
    },
];

// =============================================================================
// Operations
// =============================================================================

/// The ordered sequence of all registered type keys. Pure, no failure mode.
pub fn list_types() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|def| def.key)
}

/// Returns the definition for a known key.
///
/// ## Errors
/// [`CatalogError::UnknownFabricType`] if the key is not registered.
pub fn definition(type_key: &str) -> Result<&'static FabricTypeDef, CatalogError> {
    REGISTRY
        .iter()
        .find(|def| def.key == type_key)
        .ok_or_else(|| CatalogError::UnknownFabricType(type_key.to_string()))
}

/// Whether `candidate` names a registered fabric type. Never fails.
pub fn is_valid_type(candidate: &str) -> bool {
    REGISTRY.iter().any(|def| def.key == candidate)
}

/// True iff `type_key` is known AND `candidate` is one of its subtypes.
///
/// An unknown type yields `false`, not an error, so this predicate can be
/// used directly in boolean validation contexts.
pub fn is_valid_subtype(type_key: &str, candidate: &str) -> bool {
    definition(type_key)
        .map(|def| def.has_subtype(candidate))
        .unwrap_or(false)
}

/// The ordered allowed units of a fabric type.
///
/// ## Errors
/// [`CatalogError::UnknownFabricType`] if the key is not registered.
pub fn units_for(type_key: &str) -> Result<&'static [Unit], CatalogError> {
    definition(type_key).map(|def| def.units)
}

/// The unit preselected in forms for a fabric type.
///
/// ## Errors
/// [`CatalogError::UnknownFabricType`] if the key is not registered.
pub fn default_unit_for(type_key: &str) -> Result<Unit, CatalogError> {
    definition(type_key).map(|def| def.default_unit)
}

// =============================================================================
// Unit Tests
// =============================================================================
