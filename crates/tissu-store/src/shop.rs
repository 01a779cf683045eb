//! # Shop Service
//!
//! Shopper-facing operations: browsing the catalog and editing the cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Shopper Action           Service Call            Ledger Change     │
//! │  ──────────────           ────────────            ─────────────     │
//! │                                                                     │
//! │  Pick a fabric ─────────► add_to_cart() ────────► insert/replace    │
//! │  Change quantity ───────► update_quantity() ────► qty only          │
//! │  Remove a line ─────────► remove_from_cart() ───► line removed      │
//! │  Empty the cart ────────► clear_cart() ─────────► empty             │
//! │  View the cart ─────────► view_cart() ──────────► (read only)       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service resolves product ids against the database, then delegates
//! every ledger rule (validation, replace-not-sum, totals) to the cart in
//! tissu-core.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::session::CartSessions;
use tissu_core::{CartLine, Product, Quantity};
use tissu_db::Database;

/// A rendered view of one cart, with derived amounts precomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_cents: i64,
    pub line_count: usize,
}

/// One cart line with its derived total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity_hundredths: i64,
    pub unit: String,
    pub line_total_cents: i64,
}

impl CartLineView {
    fn from_line(line: &CartLine) -> Self {
        CartLineView {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price_cents: line.unit_price.cents(),
            quantity_hundredths: line.quantity.hundredths(),
            unit: line.unit.to_string(),
            line_total_cents: line.line_total().cents(),
        }
    }
}

/// Service for storefront browsing and cart editing.
#[derive(Clone)]
pub struct ShopService {
    db: Database,
    sessions: Arc<CartSessions>,
}

impl ShopService {
    /// Creates a shop service over a database and session registry.
    pub fn new(db: Database, sessions: Arc<CartSessions>) -> Self {
        ShopService { db, sessions }
    }

    /// Searches the storefront catalog.
    pub async fn search(&self, query: &str, limit: u32) -> StoreResult<Vec<Product>> {
        Ok(self.db.products().search(query, limit).await?)
    }

    /// Lists active products of one fabric type.
    pub async fn browse_fabric(&self, fabric_type: &str, limit: u32) -> StoreResult<Vec<Product>> {
        Ok(self.db.products().list_by_fabric_type(fabric_type, limit).await?)
    }

    /// Adds a product to the session's cart (or replaces its quantity if
    /// already present).
    ///
    /// The price and fabric metadata are frozen from the product row at
    /// this moment; later product edits do not affect the cart line.
    pub async fn add_to_cart(
        &self,
        session_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> StoreResult<CartView> {
        debug!(session_id = %session_id, product_id = %product_id, quantity = %quantity, "add_to_cart");

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| StoreError::UnknownProduct(product_id.to_string()))?;

        let candidate = CartLine::from_product(&product, quantity);

        self.sessions.with_cart_mut(session_id, |cart| {
            cart.add_line(candidate)?;
            Ok(render(cart))
        })
    }

    /// Changes the quantity of a line already in the cart.
    pub fn update_quantity(
        &self,
        session_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> StoreResult<CartView> {
        self.sessions.with_cart_mut(session_id, |cart| {
            cart.update_quantity(product_id, quantity)?;
            Ok(render(cart))
        })
    }

    /// Removes a line from the cart. Removing an absent line is a no-op.
    pub fn remove_from_cart(&self, session_id: &str, product_id: &str) -> CartView {
        self.sessions.with_cart_mut(session_id, |cart| {
            cart.remove_line(product_id);
            render(cart)
        })
    }

    /// Empties the session's cart.
    pub fn clear_cart(&self, session_id: &str) -> CartView {
        self.sessions.with_cart_mut(session_id, |cart| {
            cart.clear();
            render(cart)
        })
    }

    /// Read-only view of the session's cart.
    pub fn view_cart(&self, session_id: &str) -> CartView {
        self.sessions.with_cart(session_id, render)
    }
}

fn render(cart: &tissu_core::Cart) -> CartView {
    CartView {
        lines: cart.lines().iter().map(CartLineView::from_line).collect(),
        total_cents: cart.total().cents(),
        line_count: cart.line_count(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tissu_core::{CartError, Unit};
    use tissu_db::DbConfig;

    async fn shop() -> ShopService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ShopService::new(db, Arc::new(CartSessions::new()))
    }

    async fn seed_product(shop: &ShopService, id: &str, price_cents: i64, active: bool) {
        let now = Utc::now();
        shop.db
            .products()
            .insert(&Product {
                id: id.to_string(),
                name: format!("Wax Hollandais {id}"),
                description: None,
                price_cents,
                fabric_type: "wax".to_string(),
                fabric_subtype: "Hollandais".to_string(),
                unit: Unit::Meter,
                available_stock: 30,
                image_path: None,
                is_active: active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn add_view_update_remove() {
        let shop = shop().await;
        seed_product(&shop, "p1", 1500, true).await;

        let view = shop
            .add_to_cart("s1", "p1", Quantity::from_units(2))
            .await
            .unwrap();
        assert_eq!(view.total_cents, 3000);
        assert_eq!(view.line_count, 1);

        let view = shop
            .update_quantity("s1", "p1", Quantity::from_hundredths(350))
            .unwrap();
        assert_eq!(view.total_cents, 5250);

        let view = shop.remove_from_cart("s1", "p1");
        assert_eq!(view.line_count, 0);
        assert_eq!(view.total_cents, 0);
    }

    #[tokio::test]
    async fn readding_replaces_quantity() {
        let shop = shop().await;
        seed_product(&shop, "p1", 1000, true).await;

        shop.add_to_cart("s1", "p1", Quantity::from_units(3))
            .await
            .unwrap();
        let view = shop
            .add_to_cart("s1", "p1", Quantity::from_units(5))
            .await
            .unwrap();

        assert_eq!(view.line_count, 1);
        assert_eq!(view.total_cents, 5000);
    }

    #[tokio::test]
    async fn inactive_or_unknown_product_is_refused() {
        let shop = shop().await;
        seed_product(&shop, "p1", 1000, false).await;

        let err = shop
            .add_to_cart("s1", "p1", Quantity::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownProduct(_)));

        let err = shop
            .add_to_cart("s1", "ghost", Quantity::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownProduct(_)));

        assert_eq!(shop.view_cart("s1").line_count, 0);
    }

    #[tokio::test]
    async fn bad_quantity_surfaces_cart_error() {
        let shop = shop().await;
        seed_product(&shop, "p1", 1000, true).await;

        let err = shop
            .add_to_cart("s1", "p1", Quantity::from_hundredths(50))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Cart(CartError::InvalidLineItem(_))
        ));

        shop.add_to_cart("s1", "p1", Quantity::ONE).await.unwrap();
        let err = shop
            .update_quantity("s1", "p1", Quantity::from_hundredths(0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Cart(CartError::InvalidQuantity(_))));
    }

    #[tokio::test]
    async fn browse_by_fabric_type() {
        let shop = shop().await;
        seed_product(&shop, "p1", 1000, true).await;
        seed_product(&shop, "p2", 2000, true).await;

        let waxes = shop.browse_fabric("wax", 10).await.unwrap();
        assert_eq!(waxes.len(), 2);

        assert!(shop.browse_fabric("bazin", 10).await.unwrap().is_empty());
    }
}
