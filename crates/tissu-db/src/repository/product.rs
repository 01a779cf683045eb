//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Storefront search (name and fabric-type match)
//! - CRUD with soft delete
//! - Stock adjustments as deltas
//!
//! ## Why Guarded Delta Stock Updates?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: absolute write (lost update between two checkouts)      │
//! │     UPDATE products SET available_stock = 7 WHERE id = ?           │
//! │                                                                     │
//! │  ✅ CORRECT: guarded delta write                                   │
//! │     UPDATE products SET available_stock = available_stock - 3      │
//! │     WHERE id = ? AND available_stock >= 3                          │
//! │                                                                     │
//! │  The delta makes concurrent decrements compose instead of          │
//! │  overwriting each other; the WHERE guard (plus the schema CHECK)   │
//! │  makes the decrement that would oversell match zero rows and       │
//! │  fail, rather than drive stock negative.                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tissu_core::Product;

/// All product columns, in the order the [`Product`] record declares them.
const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, fabric_type, fabric_subtype, \
     unit, available_stock, image_path, is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let results = repo.search("bazin", 20).await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches active products by name or fabric type.
    ///
    /// An empty query falls back to the plain active listing. Matching is
    /// a case-insensitive substring match; catalog sizes here are a few
    /// hundred fabrics, so an indexed LIKE scan is plenty.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1
               AND (name LIKE ?1 OR fabric_type LIKE ?1 OR fabric_subtype LIKE ?1)
             ORDER BY name
             LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "search returned products");
        Ok(products)
    }

    /// Lists active products sorted by name (storefront default view).
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1
             ORDER BY name
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products of one fabric type (catalog browsing).
    pub async fn list_by_fabric_type(&self, fabric_type: &str, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1 AND fabric_type = ?1
             ORDER BY name
             LIMIT ?2"
        ))
        .bind(fabric_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found
    /// * `Ok(None)` - product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, name, description, price_cents, fabric_type, fabric_subtype,
                unit, available_stock, image_path, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.fabric_type)
        .bind(&product.fabric_subtype)
        .bind(product.unit)
        .bind(product.available_stock)
        .bind(&product.image_path)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the product doesn't exist.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                fabric_type = ?5,
                fabric_subtype = ?6,
                unit = ?7,
                available_stock = ?8,
                image_path = ?9,
                is_active = ?10,
                updated_at = ?11
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.fabric_type)
        .bind(&product.fabric_subtype)
        .bind(product.unit)
        .bind(product.available_stock)
        .bind(&product.image_path)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", &product.id));
        }

        Ok(())
    }

    /// Adjusts stock by a delta (negative for a sale, positive for restock).
    ///
    /// The update is conditional: a decrement that would take stock below
    /// zero matches no row and fails with `DbError::InsufficientStock`
    /// instead of overselling. The read-back happens only on that failure
    /// path, to tell "not found" apart from "not enough".
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET available_stock = available_stock + ?2, updated_at = ?3
             WHERE id = ?1 AND available_stock + ?2 >= 0",
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(product) => Err(DbError::InsufficientStock {
                    product_id: id.to_string(),
                    available: product.available_stock,
                }),
                None => Err(DbError::not_found("product", id)),
            };
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Order items keep referencing the row, so the record must survive;
    /// it just disappears from listings.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics and seed guards).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product id.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use tissu_core::Unit;

    fn fabric_product(id: &str, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
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
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = fabric_product("p1", "Bazin Riche Or", 1000, 25);
        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Bazin Riche Or");
        assert_eq!(fetched.unit, Unit::Meter);
        assert_eq!(fetched.available_stock, 25);

        assert!(repo.get_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_matches_name_and_fabric() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&fabric_product("p1", "Bazin Riche Or", 1000, 5))
            .await
            .unwrap();
        repo.insert(&fabric_product("p2", "Bazin Getzner Bleu", 2500, 5))
            .await
            .unwrap();

        let by_name = repo.search("Getzner", 20).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "p2");

        let by_type = repo.search("bazin", 20).await.unwrap();
        assert_eq!(by_type.len(), 2);

        let none = repo.search("velours", 20).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn adjust_stock_applies_delta() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&fabric_product("p1", "Bazin Riche Or", 1000, 10))
            .await
            .unwrap();

        repo.adjust_stock("p1", -3).await.unwrap();
        repo.adjust_stock("p1", 1).await.unwrap();

        let product = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 8);

        assert!(matches!(
            repo.adjust_stock("ghost", -1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn adjust_stock_never_goes_negative() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&fabric_product("p1", "Bazin Riche Or", 1000, 3))
            .await
            .unwrap();

        let err = repo.adjust_stock("p1", -10).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InsufficientStock { available: 3, .. }
        ));

        // The failed decrement changed nothing; draining to exactly zero works
        let product = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 3);

        repo.adjust_stock("p1", -3).await.unwrap();
        let product = repo.get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.available_stock, 0);
    }

    #[tokio::test]
    async fn soft_delete_hides_from_listings() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&fabric_product("p1", "Bazin Riche Or", 1000, 5))
            .await
            .unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.soft_delete("p1").await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.list_active(10).await.unwrap().is_empty());
        // The row itself survives for order history
        assert!(repo.get_by_id("p1").await.unwrap().is_some());
    }
}
