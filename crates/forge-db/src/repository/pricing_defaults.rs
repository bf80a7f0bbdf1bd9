//! # Pricing Defaults Repository
//!
//! Database operations for the system-wide pricing defaults singleton.
//! Edited out-of-band on the admin config screen; the engine only reads
//! it, and a MISSING row is a legal state - resolution falls back to the
//! hard-coded safety constants instead of erroring.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use forge_core::PricingDefaults;

/// Fixed key of the singleton row.
const DEFAULTS_ROW_ID: &str = "default";

/// Repository for pricing defaults database operations.
#[derive(Debug, Clone)]
pub struct PricingDefaultsRepository {
    pool: SqlitePool,
}

impl PricingDefaultsRepository {
    /// Creates a new PricingDefaultsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PricingDefaultsRepository { pool }
    }

    /// Gets the defaults row, if it has been configured.
    ///
    /// ## Returns
    /// * `Ok(Some(PricingDefaults))` - Configured defaults
    /// * `Ok(None)` - Never configured; callers use the safety constants
    pub async fn get(&self) -> DbResult<Option<PricingDefaults>> {
        let row: Option<PricingDefaults> = sqlx::query_as(
            r#"
            SELECT id, product_margin_bps, shipping_margin_bps, sample_margin_bps,
                   accessory_margin_bps, clothing_fee_cents, updated_at
            FROM pricing_defaults
            WHERE id = ?1
            "#,
        )
        .bind(DEFAULTS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Upserts the singleton defaults row.
    pub async fn upsert(
        &self,
        product_margin_bps: u32,
        shipping_margin_bps: u32,
        sample_margin_bps: u32,
        accessory_margin_bps: u32,
        clothing_fee_cents: i64,
    ) -> DbResult<PricingDefaults> {
        debug!(product_margin_bps, shipping_margin_bps, "Upserting pricing defaults");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO pricing_defaults (
                id, product_margin_bps, shipping_margin_bps, sample_margin_bps,
                accessory_margin_bps, clothing_fee_cents, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                product_margin_bps = excluded.product_margin_bps,
                shipping_margin_bps = excluded.shipping_margin_bps,
                sample_margin_bps = excluded.sample_margin_bps,
                accessory_margin_bps = excluded.accessory_margin_bps,
                clothing_fee_cents = excluded.clothing_fee_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(DEFAULTS_ROW_ID)
        .bind(product_margin_bps)
        .bind(shipping_margin_bps)
        .bind(sample_margin_bps)
        .bind(accessory_margin_bps)
        .bind(clothing_fee_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get()
            .await?
            .ok_or_else(|| DbError::not_found("PricingDefaults", DEFAULTS_ROW_ID))
    }
}
