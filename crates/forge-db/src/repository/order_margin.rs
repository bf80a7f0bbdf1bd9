//! # Order Margin Repository
//!
//! Database operations for order-level margin overrides.
//!
//! ## Lazy Upsert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  An order has NO margin row until staff first edit its margins.        │
//! │                                                                         │
//! │  First edit  ──► INSERT (row created lazily)                           │
//! │  Later edits ──► ON CONFLICT(order_id) DO UPDATE                       │
//! │  Deletion    ──► never; clearing both columns back to NULL keeps the   │
//! │                  row and means "inherit everything again"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forge_core::OrderMargin;

/// Repository for order margin database operations.
#[derive(Debug, Clone)]
pub struct OrderMarginRepository {
    pool: SqlitePool,
}

impl OrderMarginRepository {
    /// Creates a new OrderMarginRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderMarginRepository { pool }
    }

    /// Gets the margin row for an order, if one has been created yet.
    ///
    /// ## Returns
    /// * `Ok(Some(OrderMargin))` - The order has been margin-edited before
    /// * `Ok(None)` - No order-level edit has happened; inherit downward
    pub async fn get_by_order(&self, order_id: &str) -> DbResult<Option<OrderMargin>> {
        let margin: Option<OrderMargin> = sqlx::query_as(
            r#"
            SELECT id, order_id, product_margin_bps, shipping_margin_bps, created_at, updated_at
            FROM order_margins
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(margin)
    }

    /// Upserts the margin row for an order: created lazily on the first
    /// order-level edit, overwritten on every subsequent edit.
    ///
    /// Both override columns are written as given - `None` stores NULL,
    /// returning that category to "inherit client/system".
    pub async fn upsert(
        &self,
        order_id: &str,
        product_margin_bps: Option<u32>,
        shipping_margin_bps: Option<u32>,
    ) -> DbResult<OrderMargin> {
        debug!(order_id = %order_id, ?product_margin_bps, ?shipping_margin_bps, "Upserting order margin");

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO order_margins (
                id, order_id, product_margin_bps, shipping_margin_bps, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(order_id) DO UPDATE SET
                product_margin_bps = excluded.product_margin_bps,
                shipping_margin_bps = excluded.shipping_margin_bps,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(order_id)
        .bind(product_margin_bps)
        .bind(shipping_margin_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_order(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("OrderMargin", order_id))
    }
}
