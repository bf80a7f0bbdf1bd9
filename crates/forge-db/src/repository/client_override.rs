//! # Client Override Repository
//!
//! Database operations for per-client margin overrides. The rows are
//! edited out-of-band on the client config screen; the pricing engine only
//! reads them. The upsert exists for that config surface, seeding, and
//! tests.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forge_core::ClientOverride;

/// Repository for client override database operations.
#[derive(Debug, Clone)]
pub struct ClientOverrideRepository {
    pool: SqlitePool,
}

impl ClientOverrideRepository {
    /// Creates a new ClientOverrideRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientOverrideRepository { pool }
    }

    /// Gets the override row for a client, if one exists.
    ///
    /// ## Returns
    /// * `Ok(Some(ClientOverride))` - Client has a pricing row
    /// * `Ok(None)` - No row; every category inherits the system default
    pub async fn get_by_client(&self, client_id: &str) -> DbResult<Option<ClientOverride>> {
        let row: Option<ClientOverride> = sqlx::query_as(
            r#"
            SELECT id, client_id, product_margin_bps, shipping_margin_bps, sample_margin_bps,
                   created_at, updated_at
            FROM client_overrides
            WHERE client_id = ?1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Upserts a client's override row. `None` columns store NULL
    /// (inherit the system default for that category).
    pub async fn upsert(
        &self,
        client_id: &str,
        product_margin_bps: Option<u32>,
        shipping_margin_bps: Option<u32>,
        sample_margin_bps: Option<u32>,
    ) -> DbResult<ClientOverride> {
        debug!(client_id = %client_id, "Upserting client override");

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO client_overrides (
                id, client_id, product_margin_bps, shipping_margin_bps, sample_margin_bps,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT(client_id) DO UPDATE SET
                product_margin_bps = excluded.product_margin_bps,
                shipping_margin_bps = excluded.shipping_margin_bps,
                sample_margin_bps = excluded.sample_margin_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(client_id)
        .bind(product_margin_bps)
        .bind(shipping_margin_bps)
        .bind(sample_margin_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_client(client_id)
            .await?
            .ok_or_else(|| DbError::not_found("ClientOverride", client_id))
    }
}
