//! # Admin Service
//!
//! Back-office operations: product catalog management, client records, and
//! order fulfillment.
//!
//! Every product write is validated against the fabric registry before it
//! reaches the database, so a product row can never carry a fabric type,
//! subtype, or unit combination the catalog does not allow.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use tissu_core::{catalog, validation, Client, Money, Order, OrderStatus, Product, Unit};
use tissu_db::repository::client::generate_client_id;
use tissu_db::repository::product::generate_product_id;
use tissu_db::Database;

/// Input for creating or updating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub fabric_type: String,
    pub fabric_subtype: String,
    /// Measurement unit; `None` takes the fabric type's default.
    pub unit: Option<Unit>,
    pub available_stock: i64,
    pub image_path: Option<String>,
}

/// Input for creating a client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Service for back-office administration.
#[derive(Clone)]
pub struct AdminService {
    db: Database,
}

impl AdminService {
    /// Creates an admin service over a database.
    pub fn new(db: Database) -> Self {
        AdminService { db }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Creates a product after validating it against the fabric registry.
    pub async fn create_product(&self, input: ProductInput) -> StoreResult<Product> {
        debug!(name = %input.name, fabric_type = %input.fabric_type, "create_product");

        let unit = self.validate_product_input(&input)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: input.name.trim().to_string(),
            description: input.description,
            price_cents: input.price_cents,
            fabric_type: input.fabric_type,
            fabric_subtype: input.fabric_subtype,
            unit,
            available_stock: input.available_stock,
            image_path: input.image_path,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Updates a product's fields; the same registry checks as creation.
    pub async fn update_product(&self, id: &str, input: ProductInput) -> StoreResult<Product> {
        debug!(product_id = %id, "update_product");

        validation::validate_uuid(id)?;
        let unit = self.validate_product_input(&input)?;

        let mut product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::UnknownProduct(id.to_string()))?;

        product.name = input.name.trim().to_string();
        product.description = input.description;
        product.price_cents = input.price_cents;
        product.fabric_type = input.fabric_type;
        product.fabric_subtype = input.fabric_subtype;
        product.unit = unit;
        product.available_stock = input.available_stock;
        product.image_path = input.image_path;

        self.db.products().update(&product).await?;
        Ok(product)
    }

    /// Restocks a product by a positive number of units.
    pub async fn restock_product(&self, id: &str, units: i64) -> StoreResult<()> {
        validation::validate_uuid(id)?;
        if units <= 0 {
            return Err(tissu_core::ValidationError::MustBePositive { field: "units" }.into());
        }
        self.db.products().adjust_stock(id, units).await?;
        Ok(())
    }

    /// Deactivates a product (soft delete). It disappears from storefront
    /// listings but stays referenced by order history.
    pub async fn deactivate_product(&self, id: &str) -> StoreResult<()> {
        validation::validate_uuid(id)?;
        self.db.products().soft_delete(id).await?;
        info!(product_id = %id, "product deactivated");
        Ok(())
    }

    /// Storefront search passthrough.
    pub async fn search_products(&self, query: &str, limit: u32) -> StoreResult<Vec<Product>> {
        Ok(self.db.products().search(query, limit).await?)
    }

    /// Runs the registry checks shared by create and update, resolving the
    /// effective unit (explicit choice or the type's default).
    fn validate_product_input(&self, input: &ProductInput) -> StoreResult<Unit> {
        validation::validate_product_name(&input.name)?;
        validation::validate_unit_price(Money::from_cents(input.price_cents))?;
        validation::validate_fabric_type(&input.fabric_type)?;
        validation::validate_fabric_subtype(&input.fabric_type, &input.fabric_subtype)?;

        let unit = match input.unit {
            Some(unit) => {
                validation::validate_unit_choice(&input.fabric_type, unit)?;
                unit
            }
            None => catalog::default_unit_for(&input.fabric_type)?,
        };

        Ok(unit)
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// Creates a client record.
    pub async fn create_client(&self, input: ClientInput) -> StoreResult<Client> {
        let full_name = input.full_name.trim();
        if full_name.is_empty() {
            return Err(tissu_core::ValidationError::Required { field: "full_name" }.into());
        }
        if input.email.trim().is_empty() {
            return Err(tissu_core::ValidationError::Required { field: "email" }.into());
        }

        let now = Utc::now();
        let client = Client {
            id: generate_client_id(),
            full_name: full_name.to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone,
            address: input.address,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.db.clients().insert(&client).await?;

        info!(client_id = %client.id, "client created");
        Ok(client)
    }

    /// Lists active clients.
    pub async fn list_clients(&self, limit: u32) -> StoreResult<Vec<Client>> {
        Ok(self.db.clients().list_active(limit).await?)
    }

    /// Deactivates a client (soft delete).
    pub async fn deactivate_client(&self, id: &str) -> StoreResult<()> {
        validation::validate_uuid(id)?;
        self.db.clients().soft_delete(id).await?;
        info!(client_id = %id, "client deactivated");
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Writes an order's fulfillment status.
    pub async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> StoreResult<()> {
        validation::validate_uuid(order_id)?;
        self.db.orders().set_status(order_id, status).await?;
        Ok(())
    }

    /// Lists recent orders across all clients.
    pub async fn list_recent_orders(&self, limit: u32) -> StoreResult<Vec<Order>> {
        Ok(self.db.orders().list_recent(limit).await?)
    }

    /// Lists the fulfillment queue for one status, oldest first.
    pub async fn list_orders_by_status(
        &self,
        status: OrderStatus,
        limit: u32,
    ) -> StoreResult<Vec<Order>> {
        Ok(self.db.orders().list_by_status(status, limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
