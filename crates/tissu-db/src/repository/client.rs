//! # Client Repository
//!
//! Database operations for back-office client records.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tissu_core::Client;

const CLIENT_COLUMNS: &str =
    "id, full_name, email, phone, address, is_active, created_at, updated_at";

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Inserts a new client.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the email is already taken.
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, email = %client.email, "inserting client");

        sqlx::query(
            "INSERT INTO clients (
                id, full_name, email, phone, address, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.is_active)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a client by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Gets a client by email (emails are unique).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Lists active clients sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS}
             FROM clients
             WHERE is_active = 1
             ORDER BY full_name
             LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Updates a client's profile fields.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "updating client");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE clients SET
                full_name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5,
                is_active = ?6,
                updated_at = ?7
             WHERE id = ?1",
        )
        .bind(&client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("client", &client.id));
        }

        Ok(())
    }

    /// Soft-deletes a client. Order history keeps referencing the row.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "soft-deleting client");

        let now = Utc::now();

        let result = sqlx::query("UPDATE clients SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("client", id));
        }

        Ok(())
    }
}

/// Generates a new client id.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
