//! # Domain Types
//!
//! Core domain types shared across the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Product     │   │    Order      │   │    Client     │         │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │         │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ id (UUID)     │         │
//! │  │ fabric_type   │   │ client_id     │   │ full_name     │         │
//! │  │ price_cents   │   │ status        │   │ email         │         │
//! │  │ unit          │   │ total_cents   │   │ phone         │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐                             │
//! │  │   Quantity    │   │  OrderStatus  │                             │
//! │  │ ───────────── │   │ ───────────── │                             │
//! │  │ hundredths    │   │  Pending      │                             │
//! │  │ of a unit     │   │  Shipped      │                             │
//! │  │ (i64)         │   │  Delivered    │                             │
//! │  └───────────────┘   └───────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Unit;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Quantity
// =============================================================================

/// A purchase quantity in fixed-point hundredths of a measurement unit.
///
/// ## Why Hundredths?
/// Fabric sold by the meter is cut to fractional lengths (2.50 m), but
/// binary floats cannot represent such values exactly. Hundredths keep the
/// quantity integral while supporting two decimal places — the same trick
/// [`Money`] uses for cents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// One whole unit, the minimum orderable quantity.
    pub const ONE: Quantity = Quantity(100);

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * 100)
    }

    /// Creates a quantity from hundredths of a unit (250 = 2.50 units).
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    /// Converts a caller-supplied decimal into a quantity.
    ///
    /// Rejects NaN, infinities, and non-positive input; rounds to the
    /// nearest hundredth. This is the only place floats touch quantities.
    pub fn try_from_f64(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field: "quantity" });
        }
        if value <= 0.0 {
            return Err(ValidationError::MustBePositive { field: "quantity" });
        }
        Ok(Quantity((value * 100.0).round() as i64))
    }

    /// The raw value in hundredths of a unit.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// The whole-unit portion (2 for 2.50 units).
    #[inline]
    pub const fn whole_units(&self) -> i64 {
        self.0 / 100
    }

    /// Whether this quantity is an exact number of whole units.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % 100 == 0
    }

    /// Whether this quantity satisfies the ≥ 1 unit minimum.
    #[inline]
    pub const fn is_orderable(&self) -> bool {
        self.0 >= Quantity::ONE.0
    }
}

/// Displays "3" for whole quantities, "2.50" otherwise.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{}", self.whole_units())
        } else {
            write!(f, "{}.{:02}", self.whole_units(), (self.0 % 100).abs())
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as supplied by the product repository.
///
/// The fabric metadata fields (`fabric_type`, `fabric_subtype`, `unit`)
/// are validated against the catalog registry when a product record is
/// written, and again when a line item enters a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the storefront.
    pub name: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Price in cents for one unit of measure.
    pub price_cents: i64,

    /// Catalog key of the fabric type (e.g. "bazin").
    pub fabric_type: String,

    /// Subtype label within the fabric type (e.g. "Riche").
    pub fabric_subtype: String,

    /// Unit this product is priced in.
    pub unit: Unit,

    /// Stock on hand, in whole units of measure.
    pub available_stock: i64,

    /// Storage path of the product image, if one was uploaded.
    pub image_path: Option<String>,

    /// Whether the product is listed (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether enough stock remains to sell `quantity`.
    ///
    /// Stock sufficiency is a caller-side check made before a line item
    /// enters a cart; the cart itself enforces no upper bound.
    pub fn can_sell(&self, quantity: Quantity) -> bool {
        self.is_active && quantity.hundredths() <= self.available_stock * 100
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The stored state of an order.
///
/// Exactly three values, written directly by the back-office — there is no
/// workflow engine behind this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order received, not yet dispatched.
    Pending,
    /// Order handed to the carrier.
    Shipped,
    /// Order confirmed received by the client.
    Delivered,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order created from a cart at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub status: OrderStatus,
    /// Cart total frozen at checkout time.
    pub total_cents: i64,
    /// Free-form delivery address captured at checkout.
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order.
///
/// Uses the snapshot pattern: product name, fabric metadata, and unit price
/// are frozen at checkout so order history survives later product edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Product name at checkout time (frozen).
    pub name_snapshot: String,
    /// Fabric type key at checkout time (frozen).
    pub fabric_type: String,
    /// Fabric subtype at checkout time (frozen).
    pub fabric_subtype: String,
    /// Unit the line was priced in.
    pub unit: Unit,
    /// Unit price in cents at checkout time (frozen).
    pub unit_price_cents: i64,
    /// Quantity in hundredths of a unit.
    pub quantity_hundredths: i64,
    /// Line total in cents (unit price × quantity, frozen).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the ordered quantity.
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_hundredths(self.quantity_hundredths)
    }

    /// Returns the frozen line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A back-office client record.
///
/// Authentication is handled by an external identity provider; this record
/// only carries the profile data the storefront itself needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Whether the client account is active (soft delete).
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_constructors() {
        assert_eq!(Quantity::from_units(3).hundredths(), 300);
        assert_eq!(Quantity::from_hundredths(250).whole_units(), 2);
        assert!(Quantity::from_units(1).is_whole());
        assert!(!Quantity::from_hundredths(150).is_whole());
    }

    #[test]
    fn quantity_minimum() {
        assert!(Quantity::ONE.is_orderable());
        assert!(Quantity::from_hundredths(150).is_orderable());
        assert!(!Quantity::from_hundredths(99).is_orderable());
        assert!(!Quantity::from_hundredths(0).is_orderable());
    }

    #[test]
    fn quantity_from_f64() {
        assert_eq!(
            Quantity::try_from_f64(2.5).unwrap(),
            Quantity::from_hundredths(250)
        );
        assert_eq!(
            Quantity::try_from_f64(f64::NAN),
            Err(ValidationError::NotFinite { field: "quantity" })
        );
        assert_eq!(
            Quantity::try_from_f64(f64::INFINITY),
            Err(ValidationError::NotFinite { field: "quantity" })
        );
        assert_eq!(
            Quantity::try_from_f64(-1.0),
            Err(ValidationError::MustBePositive { field: "quantity" })
        );
        assert_eq!(
            Quantity::try_from_f64(0.0),
            Err(ValidationError::MustBePositive { field: "quantity" })
        );
    }

    #[test]
    fn quantity_display() {
        assert_eq!(Quantity::from_units(3).to_string(), "3");
        assert_eq!(Quantity::from_hundredths(250).to_string(), "2.50");
        assert_eq!(Quantity::from_hundredths(105).to_string(), "1.05");
    }

    #[test]
    fn product_can_sell_respects_stock_and_activity() {
        let now = Utc::now();
        let mut product = Product {
            id: "p1".to_string(),
            name: "Bazin Riche Or".to_string(),
            description: None,
            price_cents: 1000,
            fabric_type: "bazin".to_string(),
            fabric_subtype: "Riche".to_string(),
            unit: Unit::Meter,
            available_stock: 5,
            image_path: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert!(product.can_sell(Quantity::from_units(5)));
        assert!(product.can_sell(Quantity::from_hundredths(450)));
        assert!(!product.can_sell(Quantity::from_hundredths(501)));

        product.is_active = false;
        assert!(!product.can_sell(Quantity::ONE));
    }

    #[test]
    fn order_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn order_item_accessors() {
        let item = OrderItem {
            id: "i1".to_string(),
            order_id: "o1".to_string(),
            product_id: "p1".to_string(),
            name_snapshot: "Wax Hollandais".to_string(),
            fabric_type: "wax".to_string(),
            fabric_subtype: "Hollandais".to_string(),
            unit: Unit::Roll,
            unit_price_cents: 4500,
            quantity_hundredths: 200,
            line_total_cents: 9000,
            created_at: Utc::now(),
        };
        assert_eq!(item.unit_price().cents(), 4500);
        assert_eq!(item.quantity(), Quantity::from_units(2));
        assert_eq!(item.line_total().cents(), 9000);
    }
}
