//! # Checkout Service
//!
//! Turns a cart session into a persisted order.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. Snapshot the cart (total + lines, under the session lock)       │
//! │  2. Refuse an empty cart                                            │
//! │  3. Verify the client exists and is active                          │
//! │  4. Pre-check each product is still sellable at the requested qty   │
//! │  5. Insert order + frozen line items + stock decrements in ONE      │
//! │     transaction (the decrement is conditional, so a concurrent      │
//! │     checkout that won the race makes this one fail and roll back)   │
//! │  6. Clear the cart (only after everything above succeeded)          │
//! │                                                                     │
//! │  The step-4 pre-check is advisory (a friendly early error); the     │
//! │  step-5 transaction is what actually prevents overselling. A        │
//! │  failure at any step leaves the cart intact so the shopper can      │
//! │  fix the problem and retry.                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::session::CartSessions;
use tissu_core::{CartLine, Order, OrderItem, OrderStatus};
use tissu_db::repository::order::{generate_order_id, generate_order_item_id};
use tissu_db::{Database, DbError};

/// Summary returned to the shopper after a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub total_cents: i64,
    pub item_count: usize,
}

/// An order together with its line items, for order history views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Service that places orders from cart sessions.
#[derive(Clone)]
pub struct CheckoutService {
    db: Database,
    sessions: Arc<CartSessions>,
}

impl CheckoutService {
    /// Creates a checkout service over a database and session registry.
    pub fn new(db: Database, sessions: Arc<CartSessions>) -> Self {
        CheckoutService { db, sessions }
    }

    /// Places an order from the given session's cart.
    ///
    /// The cart is cleared only after the order is committed; any earlier
    /// failure leaves the ledger untouched.
    pub async fn place_order(
        &self,
        session_id: &str,
        client_id: &str,
        shipping_address: Option<String>,
    ) -> StoreResult<CheckoutReceipt> {
        debug!(session_id = %session_id, client_id = %client_id, "place_order");

        let (lines, total) = self
            .sessions
            .with_cart(session_id, |cart| (cart.snapshot(), cart.total()));

        if lines.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let client = self
            .db
            .clients()
            .get_by_id(client_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| StoreError::UnknownClient(client_id.to_string()))?;

        // Cart prices are frozen at add-time; stock is not. Re-check each
        // product right before committing.
        for line in &lines {
            let product = self
                .db
                .products()
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| StoreError::UnknownProduct(line.product_id.clone()))?;

            if !product.can_sell(line.quantity) {
                return Err(StoreError::InsufficientStock {
                    product_id: line.product_id.clone(),
                    requested: line.quantity.to_string(),
                    available: product.available_stock,
                });
            }
        }

        let order_id = generate_order_id();
        let now = Utc::now();

        let order = Order {
            id: order_id.clone(),
            client_id: client.id.clone(),
            status: OrderStatus::Pending,
            total_cents: total.cents(),
            shipping_address,
            created_at: now,
            updated_at: now,
        };

        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| freeze_line(&order_id, line))
            .collect();

        // The insert decrements stock inside its own transaction; losing a
        // race for the last units surfaces here, after the pre-check passed.
        if let Err(err) = self.db.orders().insert_with_items(&order, &items).await {
            return Err(match err {
                DbError::InsufficientStock {
                    product_id,
                    available,
                } => {
                    let requested = lines
                        .iter()
                        .find(|line| line.product_id == product_id)
                        .map(|line| line.quantity.to_string())
                        .unwrap_or_default();
                    StoreError::InsufficientStock {
                        product_id,
                        requested,
                        available,
                    }
                }
                other => other.into(),
            });
        }

        self.sessions.with_cart_mut(session_id, |cart| cart.clear());

        info!(
            order_id = %order_id,
            client_id = %client.id,
            total_cents = total.cents(),
            items = items.len(),
            "order placed"
        );

        Ok(CheckoutReceipt {
            order_id,
            total_cents: total.cents(),
            item_count: items.len(),
        })
    }

    /// Fetches an order with its line items.
    pub async fn get_order(&self, order_id: &str) -> StoreResult<OrderView> {
        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("order", order_id))?;

        let items = self.db.orders().items_for(order_id).await?;

        Ok(OrderView { order, items })
    }

    /// Lists a client's order history, newest first.
    pub async fn order_history(&self, client_id: &str, limit: u32) -> StoreResult<Vec<Order>> {
        Ok(self.db.orders().list_for_client(client_id, limit).await?)
    }
}

/// Freezes one cart line into an order item row.
fn freeze_line(order_id: &str, line: &CartLine) -> OrderItem {
    OrderItem {
        id: generate_order_item_id(),
        order_id: order_id.to_string(),
        product_id: line.product_id.clone(),
        name_snapshot: line.name.clone(),
        fabric_type: line.fabric_type.clone(),
        fabric_subtype: line.fabric_subtype.clone(),
        unit: line.unit,
        unit_price_cents: line.unit_price.cents(),
        quantity_hundredths: line.quantity.hundredths(),
        line_total_cents: line.line_total().cents(),
        created_at: Utc::now(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tissu_core::{Client, Product, Quantity, Unit};
    use tissu_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_client(db: &Database, id: &str) {
        let now = Utc::now();
        db.clients()
            .insert(&Client {
                id: id.to_string(),
                full_name: "Awa Diallo".to_string(),
                email: format!("{id}@example.com"),
                phone: None,
                address: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    async fn seed_product(db: &Database, id: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: id.to_string(),
            name: format!("Bazin Riche {id}"),
            description: None,
            price_cents,
            fabric_type: "bazin".to_string(),
            fabric_subtype: "Riche".to_string(),
            unit: Unit::Meter,
            available_stock: stock,
            image_path: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    fn add_to_cart(sessions: &CartSessions, session: &str, product: &Product, units: i64) {
        sessions
            .with_cart_mut(session, |cart| {
                cart.add_line(CartLine::from_product(product, Quantity::from_units(units)))
            })
            .unwrap();
    }

    #[tokio::test]
    async fn place_order_persists_and_clears_cart() {
        let db = test_db().await;
        seed_client(&db, "c1").await;
        let product = seed_product(&db, "p1", 1000, 10).await;

        let sessions = Arc::new(CartSessions::new());
        add_to_cart(&sessions, "s1", &product, 3);

        let service = CheckoutService::new(db.clone(), Arc::clone(&sessions));
        let receipt = service
            .place_order("s1", "c1", Some("Dakar".to_string()))
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 3000);
        assert_eq!(receipt.item_count, 1);

        // Cart cleared after success
        assert!(sessions.with_cart("s1", |cart| cart.is_empty()));

        // Order and frozen items persisted
        let view = service.get_order(&receipt.order_id).await.unwrap();
        assert_eq!(view.order.status, OrderStatus::Pending);
        assert_eq!(view.order.total_cents, 3000);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name_snapshot, "Bazin Riche p1");
        assert_eq!(view.items[0].line_total_cents, 3000);

        // Stock decremented
        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 7);
    }

    #[tokio::test]
    async fn empty_cart_is_refused() {
        let db = test_db().await;
        seed_client(&db, "c1").await;

        let sessions = Arc::new(CartSessions::new());
        let service = CheckoutService::new(db, sessions);

        let result = service.place_order("s1", "c1", None).await;
        assert!(matches!(result, Err(StoreError::EmptyCart)));
    }

    #[tokio::test]
    async fn unknown_client_keeps_cart_intact() {
        let db = test_db().await;
        let product = seed_product(&db, "p1", 1000, 10).await;

        let sessions = Arc::new(CartSessions::new());
        add_to_cart(&sessions, "s1", &product, 2);

        let service = CheckoutService::new(db, Arc::clone(&sessions));
        let result = service.place_order("s1", "ghost", None).await;

        assert!(matches!(result, Err(StoreError::UnknownClient(_))));
        assert_eq!(sessions.with_cart("s1", |cart| cart.line_count()), 1);
    }

    #[tokio::test]
    async fn insufficient_stock_blocks_checkout() {
        let db = test_db().await;
        seed_client(&db, "c1").await;
        let product = seed_product(&db, "p1", 1000, 2).await;

        let sessions = Arc::new(CartSessions::new());
        add_to_cart(&sessions, "s1", &product, 5);

        let service = CheckoutService::new(db.clone(), Arc::clone(&sessions));
        let result = service.place_order("s1", "c1", None).await;

        assert!(matches!(
            result,
            Err(StoreError::InsufficientStock { available: 2, .. })
        ));

        // Nothing persisted, cart intact
        assert!(service.order_history("c1", 10).await.unwrap().is_empty());
        assert_eq!(sessions.with_cart("s1", |cart| cart.line_count()), 1);
    }

    #[tokio::test]
    async fn concurrent_checkouts_cannot_oversell() {
        let db = test_db().await;
        seed_client(&db, "c1").await;
        let product = seed_product(&db, "p1", 1000, 3).await;

        let sessions = Arc::new(CartSessions::new());
        add_to_cart(&sessions, "s1", &product, 2);
        add_to_cart(&sessions, "s2", &product, 2);

        let service = CheckoutService::new(db.clone(), Arc::clone(&sessions));
        let (r1, r2) = tokio::join!(
            service.place_order("s1", "c1", None),
            service.place_order("s2", "c1", None),
        );

        // 3 on hand, two orders of 2: exactly one can win
        assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 1);
        assert_eq!(service.order_history("c1", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn price_change_after_add_keeps_cart_price() {
        let db = test_db().await;
        seed_client(&db, "c1").await;
        let mut product = seed_product(&db, "p1", 1000, 10).await;

        let sessions = Arc::new(CartSessions::new());
        add_to_cart(&sessions, "s1", &product, 2);

        // Price goes up after the shopper added the line
        product.price_cents = 9999;
        db.products().update(&product).await.unwrap();

        let service = CheckoutService::new(db, Arc::clone(&sessions));
        let receipt = service.place_order("s1", "c1", None).await.unwrap();

        assert_eq!(receipt.total_cents, 2000);
    }

    #[tokio::test]
    async fn order_history_is_per_client() {
        let db = test_db().await;
        seed_client(&db, "c1").await;
        seed_client(&db, "c2").await;
        let product = seed_product(&db, "p1", 1000, 50).await;

        let sessions = Arc::new(CartSessions::new());
        let service = CheckoutService::new(db, Arc::clone(&sessions));

        add_to_cart(&sessions, "s1", &product, 1);
        service.place_order("s1", "c1", None).await.unwrap();

        add_to_cart(&sessions, "s2", &product, 2);
        service.place_order("s2", "c2", None).await.unwrap();

        assert_eq!(service.order_history("c1", 10).await.unwrap().len(), 1);
        assert_eq!(service.order_history("c2", 10).await.unwrap().len(), 1);
    }
}
