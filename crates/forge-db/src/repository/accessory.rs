//! # Accessory Repository
//!
//! Database operations for accessory inventory records. Accessories are
//! scoped to a client and optionally a manufacturer; bulk recalculation
//! re-derives each record's client unit cost from its manufacturer unit
//! cost.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forge_core::Accessory;

/// Repository for accessory database operations.
#[derive(Debug, Clone)]
pub struct AccessoryRepository {
    pool: SqlitePool,
}

impl AccessoryRepository {
    /// Creates a new AccessoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccessoryRepository { pool }
    }

    /// Inserts a new accessory.
    pub async fn insert(&self, accessory: &Accessory) -> DbResult<()> {
        debug!(id = %accessory.id, name = %accessory.name, "Inserting accessory");

        sqlx::query(
            r#"
            INSERT INTO accessories (
                id, client_id, manufacturer_id, name,
                manufacturer_unit_cost_cents, client_unit_cost_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&accessory.id)
        .bind(&accessory.client_id)
        .bind(&accessory.manufacturer_id)
        .bind(&accessory.name)
        .bind(accessory.manufacturer_unit_cost_cents)
        .bind(accessory.client_unit_cost_cents)
        .bind(accessory.created_at)
        .bind(accessory.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an accessory by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Accessory>> {
        let accessory: Option<Accessory> = sqlx::query_as(
            r#"
            SELECT id, client_id, manufacturer_id, name,
                   manufacturer_unit_cost_cents, client_unit_cost_cents,
                   created_at, updated_at
            FROM accessories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(accessory)
    }

    /// Lists a client's accessories, optionally narrowed to one
    /// manufacturer.
    ///
    /// ## Scoping
    /// Bulk recalculation passes the order's manufacturer when the order
    /// has one: only accessories sourced from that manufacturer are
    /// repriced. With no manufacturer given, every accessory of the
    /// client is in scope.
    pub async fn list_for_client(
        &self,
        client_id: &str,
        manufacturer_id: Option<&str>,
    ) -> DbResult<Vec<Accessory>> {
        let accessories: Vec<Accessory> = match manufacturer_id {
            Some(manufacturer_id) => {
                sqlx::query_as(
                    r#"
                    SELECT id, client_id, manufacturer_id, name,
                           manufacturer_unit_cost_cents, client_unit_cost_cents,
                           created_at, updated_at
                    FROM accessories
                    WHERE client_id = ?1 AND manufacturer_id = ?2
                    ORDER BY name
                    "#,
                )
                .bind(client_id)
                .bind(manufacturer_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, client_id, manufacturer_id, name,
                           manufacturer_unit_cost_cents, client_unit_cost_cents,
                           created_at, updated_at
                    FROM accessories
                    WHERE client_id = ?1
                    ORDER BY name
                    "#,
                )
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(accessories)
    }

    /// Writes a recomputed client unit cost.
    pub async fn update_client_unit_cost(&self, id: &str, cost_cents: i64) -> DbResult<()> {
        debug!(id = %id, cost_cents, "Writing accessory client unit cost");

        let result = sqlx::query(
            r#"
            UPDATE accessories SET
                client_unit_cost_cents = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Accessory", id));
        }

        Ok(())
    }
}

/// Helper to generate a new accessory ID.
pub fn generate_accessory_id() -> String {
    Uuid::new_v4().to_string()
}
