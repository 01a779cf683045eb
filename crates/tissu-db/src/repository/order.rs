//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Checkout                                                           │
//! │     │ product name, fabric, unit price frozen into order_items     │
//! │     ▼                                                               │
//! │  orders ──< order_items                                             │
//! │                                                                     │
//! │  Later product edits or deactivations never change what the        │
//! │  client ordered.                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tissu_core::{Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str =
    "id, client_id, status, total_cents, shipping_address, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, name_snapshot, fabric_type, fabric_subtype, \
     unit, unit_price_cents, quantity_hundredths, line_total_cents, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order together with its line items and decrements stock,
    /// atomically.
    ///
    /// Everything goes through one transaction: an order with half its
    /// lines is worse than no order at all. The stock decrement is part of
    /// the same transaction and conditional on sufficient stock, so two
    /// checkouts racing for the last units cannot both commit — the loser
    /// fails with `DbError::InsufficientStock` and nothing persists.
    ///
    /// Stock is whole units; fractional quantities consume the ceiling,
    /// since a cut length consumes the piece it came from.
    pub async fn insert_with_items(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        info!(
            order_id = %order.id,
            client_id = %order.client_id,
            items = items.len(),
            total_cents = order.total_cents,
            "inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (
                id, client_id, status, total_cents, shipping_address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&order.id)
        .bind(&order.client_id)
        .bind(order.status)
        .bind(order.total_cents)
        .bind(&order.shipping_address)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (
                    id, order_id, product_id, name_snapshot, fabric_type, fabric_subtype,
                    unit, unit_price_cents, quantity_hundredths, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(&item.fabric_type)
            .bind(&item.fabric_subtype)
            .bind(item.unit)
            .bind(item.unit_price_cents)
            .bind(item.quantity_hundredths)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            let consumed = (item.quantity_hundredths + 99) / 100;
            let result = sqlx::query(
                "UPDATE products
                 SET available_stock = available_stock - ?2, updated_at = ?3
                 WHERE id = ?1 AND available_stock >= ?2",
            )
            .bind(&item.product_id)
            .bind(consumed)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back the order and any
                // lines already written
                let available: Option<i64> =
                    sqlx::query_scalar("SELECT available_stock FROM products WHERE id = ?1")
                        .bind(&item.product_id)
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(match available {
                    Some(available) => DbError::InsufficientStock {
                        product_id: item.product_id.clone(),
                        available,
                    },
                    None => DbError::not_found("product", &item.product_id),
                });
            }
        }

        tx.commit().await?;

        debug!(order_id = %order.id, "order committed");
        Ok(())
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists the line items of an order, in insertion order.
    pub async fn items_for(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ?1 ORDER BY rowid"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a client's orders, newest first.
    pub async fn list_for_client(&self, client_id: &str, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders
             WHERE client_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2"
        ))
        .bind(client_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists the most recent orders across all clients (back-office view).
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders
             ORDER BY created_at DESC
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists orders in a given status, oldest first (fulfillment queue).
    pub async fn list_by_status(&self, status: OrderStatus, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders
             WHERE status = ?1
             ORDER BY created_at
             LIMIT ?2"
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Sets an order's fulfillment status.
    ///
    /// Any of the three states may be written directly; there is no
    /// enforced progression, so a mis-click can be corrected by writing
    /// the right state again.
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> DbResult<()> {
        info!(order_id = %id, status = ?status, "updating order status");

        let now = Utc::now();

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("order", id));
        }

        Ok(())
    }
}

/// Generates a new order id.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new order item id.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tissu_core::{Client, Unit};

    async fn seeded_client(db: &Database, id: &str) {
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

    fn test_order(id: &str, client_id: &str, total_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: id.to_string(),
            client_id: client_id.to_string(),
            status: OrderStatus::Pending,
            total_cents,
            shipping_address: Some("12 Rue du Marché, Dakar".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn test_item(id: &str, order_id: &str) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            order_id: order_id.to_string(),
            product_id: "p1".to_string(),
            name_snapshot: "Wax Hollandais".to_string(),
            fabric_type: "wax".to_string(),
            fabric_subtype: "Hollandais".to_string(),
            unit: Unit::Meter,
            unit_price_cents: 1500,
            quantity_hundredths: 200,
            line_total_cents: 3000,
            created_at: Utc::now(),
        }
    }

    async fn seeded_product(db: &Database) {
        let now = Utc::now();
        db.products()
            .insert(&tissu_core::Product {
                id: "p1".to_string(),
                name: "Wax Hollandais".to_string(),
                description: None,
                price_cents: 1500,
                fabric_type: "wax".to_string(),
                fabric_subtype: "Hollandais".to_string(),
                unit: Unit::Meter,
                available_stock: 10,
                image_path: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn insert_with_items_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seeded_client(&db, "c1").await;
        seeded_product(&db).await;

        let repo = db.orders();
        let order = test_order("o1", "c1", 3000);
        let items = vec![test_item("i1", "o1")];

        repo.insert_with_items(&order, &items).await.unwrap();

        let fetched = repo.get_by_id("o1").await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.total_cents, 3000);

        let fetched_items = repo.items_for("o1").await.unwrap();
        assert_eq!(fetched_items.len(), 1);
        assert_eq!(fetched_items[0].name_snapshot, "Wax Hollandais");
        assert_eq!(fetched_items[0].line_total_cents, 3000);

        // 2.00 units consumed out of 10
        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 8);
    }

    #[tokio::test]
    async fn insert_rolls_back_when_stock_is_short() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seeded_client(&db, "c1").await;
        seeded_product(&db).await;

        let repo = db.orders();
        let mut item = test_item("i1", "o1");
        item.quantity_hundredths = 1100; // 11 units, only 10 on hand

        let err = repo
            .insert_with_items(&test_order("o1", "c1", 16500), &[item])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock { available: 10, .. }
        ));

        // Neither the order nor its lines survived the rollback
        assert!(repo.get_by_id("o1").await.unwrap().is_none());
        assert!(repo.items_for("o1").await.unwrap().is_empty());

        // Stock untouched
        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 10);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_client() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.orders();

        let result = repo
            .insert_with_items(&test_order("o1", "ghost", 1000), &[])
            .await;

        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
        assert!(repo.get_by_id("o1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_status_writes_any_state() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seeded_client(&db, "c1").await;

        let repo = db.orders();
        repo.insert_with_items(&test_order("o1", "c1", 1000), &[])
            .await
            .unwrap();

        repo.set_status("o1", OrderStatus::Shipped).await.unwrap();
        assert_eq!(
            repo.get_by_id("o1").await.unwrap().unwrap().status,
            OrderStatus::Shipped
        );

        // no enforced progression: correcting back to pending is allowed
        repo.set_status("o1", OrderStatus::Pending).await.unwrap();
        assert_eq!(
            repo.get_by_id("o1").await.unwrap().unwrap().status,
            OrderStatus::Pending
        );

        assert!(matches!(
            repo.set_status("ghost", OrderStatus::Delivered).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_by_status_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seeded_client(&db, "c1").await;

        let repo = db.orders();
        repo.insert_with_items(&test_order("o1", "c1", 1000), &[])
            .await
            .unwrap();
        repo.insert_with_items(&test_order("o2", "c1", 2000), &[])
            .await
            .unwrap();
        repo.set_status("o2", OrderStatus::Shipped).await.unwrap();

        let pending = repo.list_by_status(OrderStatus::Pending, 10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "o1");

        let for_client = repo.list_for_client("c1", 10).await.unwrap();
        assert_eq!(for_client.len(), 2);
    }
}
