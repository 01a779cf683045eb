//! # Cart Ledger
//!
//! The authoritative in-memory state of one shopper's selections.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Caller Action              Ledger Operation       State Change     │
//! │  ─────────────              ────────────────       ────────────     │
//! │                                                                     │
//! │  Pick a product ──────────► add_line() ──────────► insert/replace   │
//! │  Change quantity ─────────► update_quantity() ───► qty only         │
//! │  Remove a line ───────────► remove_line() ───────► line removed     │
//! │  Checkout succeeded ──────► clear() ─────────────► empty            │
//! │  Display the cart ────────► lines() / total() ───► (read only)      │
//! │                                                                     │
//! │  Every mutation is validate-then-commit: a failed call leaves the   │
//! │  ledger exactly as it was.                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One `Cart` instance corresponds to one shopper context. The ledger
//! itself is single-threaded; when shared across concurrent request
//! handlers it must sit behind an external lock (see `tissu-store`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Unit;
use crate::error::{CartError, CartResult, LineItemRejection, ValidationError};
use crate::money::Money;
use crate::types::{Product, Quantity};
use crate::validation;

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in a cart.
///
/// ## Price Freezing
/// The unit price is captured when the line is added. If the product price
/// changes afterwards, the cart keeps displaying what the shopper agreed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Identifier of the referenced product, unique within a cart.
    pub product_id: String,

    /// Display name at time of adding (informational only).
    pub name: String,

    /// Price for one unit of measure, frozen at add-time.
    pub unit_price: Money,

    /// Chosen quantity, at least one unit.
    pub quantity: Quantity,

    /// Catalog key of the fabric type.
    pub fabric_type: String,

    /// Subtype label within the fabric type.
    pub fabric_subtype: String,

    /// Chosen measurement unit.
    pub unit: Unit,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Builds a candidate line from a product record and a chosen quantity.
    pub fn from_product(product: &Product, quantity: Quantity) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price(),
            quantity,
            fabric_type: product.fabric_type.clone(),
            fabric_subtype: product.fabric_subtype.clone(),
            unit: product.unit,
            added_at: Utc::now(),
        }
    }

    /// The line total: `unit_price × quantity`, recomputed on every read.
    pub fn line_total(&self) -> Money {
        self.unit_price.line_total(self.quantity)
    }

    /// Runs every field invariant, collecting all failures.
    fn validate(&self) -> Vec<ValidationError> {
        let mut failures = Vec::new();

        if let Err(e) = validation::validate_unit_price(self.unit_price) {
            failures.push(e);
        }
        if let Err(e) = validation::validate_quantity(self.quantity) {
            failures.push(e);
        }
        match validation::validate_fabric_type(&self.fabric_type) {
            Err(e) => failures.push(e),
            Ok(()) => {
                // Subtype and unit checks only make sense for a known type;
                // an unknown type already fails the whole candidate.
                if let Err(e) =
                    validation::validate_fabric_subtype(&self.fabric_type, &self.fabric_subtype)
                {
                    failures.push(e);
                }
                if let Err(e) = validation::validate_unit_choice(&self.fabric_type, self.unit) {
                    failures.push(e);
                }
            }
        }

        failures
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart ledger for one shopper session.
///
/// ## Invariants
/// - Product ids are unique; re-adding replaces the quantity (never sums)
/// - Insertion order is preserved for display, including across replaces
/// - The total is derived on every call, never cached
/// - Exactly two conceptual states: Empty and NonEmpty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a candidate line to the cart, or replaces the quantity of an
    /// existing line with the same product id.
    ///
    /// ## Validation (all-or-nothing)
    /// - unit price strictly positive
    /// - quantity at least one unit
    /// - fabric type known to the catalog
    /// - subtype valid for that type
    /// - unit valid for that type
    ///
    /// All failing fields are reported together in
    /// [`CartError::InvalidLineItem`]; the cart is untouched on failure.
    ///
    /// ## Replace, Not Sum
    /// Re-adding a product id is how quantity edits arrive from the same
    /// "add" affordance, so the candidate's quantity wins outright. The
    /// line keeps its original position and add timestamp.
    pub fn add_line(&mut self, candidate: CartLine) -> CartResult<()> {
        let failures = candidate.validate();
        if !failures.is_empty() {
            return Err(CartError::InvalidLineItem(LineItemRejection::new(failures)));
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == candidate.product_id)
        {
            existing.quantity = candidate.quantity;
            return Ok(());
        }

        self.lines.push(candidate);
        Ok(())
    }

    /// Replaces the quantity of an existing line; all other fields are
    /// left untouched.
    ///
    /// ## Errors
    /// - [`CartError::ItemNotFound`] if `product_id` is absent
    /// - [`CartError::InvalidQuantity`] if `quantity` is below one unit
    pub fn update_quantity(&mut self, product_id: &str, quantity: Quantity) -> CartResult<()> {
        if let Err(e) = validation::validate_quantity(quantity) {
            return Err(CartError::InvalidQuantity(e));
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        line.quantity = quantity;
        Ok(())
    }

    /// Removes the line for `product_id` if present.
    ///
    /// Idempotent: removing an absent id is a no-op, which keeps retried
    /// UI actions safe. Returns whether a line was actually removed.
    pub fn remove_line(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Empties the ledger unconditionally (used after checkout handoff).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The cart total: Σ `unit_price × quantity` over all current lines.
    ///
    /// Computed fresh on every call so it can never drift from line state.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart is in its Empty state.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Read-only view of the lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// An owned copy of the lines for handoff to checkout.
    ///
    /// Mutating the ledger after taking a snapshot does not change the
    /// snapshot.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Whether a line exists for `product_id`.
    pub fn contains(&self, product_id: &str) -> bool {
        self.lines.iter().any(|line| line.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
