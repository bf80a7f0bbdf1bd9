//! # Line Item Repository
//!
//! Database operations for order line items.
//!
//! ## Write Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              One Targeted Statement Per Mutation                        │
//! │                                                                         │
//! │  The engine never "saves the whole item". Each pricing mutation has    │
//! │  its own single-statement update:                                      │
//! │                                                                         │
//! │  set_manufacturer_costs    → the four cost columns                     │
//! │  update_computed_prices    → the four client price columns             │
//! │  update_product_pricing    → product price + override (set or NULL)    │
//! │  update_clothing_pricing   → product price + fee override              │
//! │  update_shipping_pricing   → air/boat prices + override                │
//! │  update_sample_fee         → sample fee (no override column exists)    │
//! │  set_shipping_link         → linked-ids JSON + note (primary side)     │
//! │  zero_covered_shipping     → costs/prices to 0 + note (covered side)   │
//! │                                                                         │
//! │  Two staff sessions racing on the same item lose whole-record          │
//! │  updates; column-targeted statements at least keep each category's     │
//! │  price/override pair consistent.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use forge_core::LineItem;

/// Columns selected for every line item read.
const LINE_ITEM_COLUMNS: &str = r#"
    id, order_id, name, is_clothing,
    cost_cents, shipping_air_cost_cents, shipping_boat_cost_cents, sample_cost_cents,
    product_margin_bps_override, shipping_margin_bps_override, clothing_fee_cents_override,
    client_product_price_cents, client_shipping_air_price_cents,
    client_shipping_boat_price_cents, client_sample_fee_cents,
    shipping_linked_item_ids, shipping_link_note,
    created_at, updated_at
"#;

/// Raw row shape: the linked-ids column is JSON TEXT in SQLite and a
/// `Vec<String>` on the domain type, so reads go through this row struct.
#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    order_id: String,
    name: String,
    is_clothing: bool,
    cost_cents: i64,
    shipping_air_cost_cents: i64,
    shipping_boat_cost_cents: i64,
    sample_cost_cents: i64,
    product_margin_bps_override: Option<u32>,
    shipping_margin_bps_override: Option<u32>,
    clothing_fee_cents_override: Option<i64>,
    client_product_price_cents: i64,
    client_shipping_air_price_cents: i64,
    client_shipping_boat_price_cents: i64,
    client_sample_fee_cents: i64,
    shipping_linked_item_ids: Option<String>,
    shipping_link_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        // A malformed JSON cell reads as "no link" rather than failing the
        // whole fetch; the link can be re-established from the UI.
        let linked = row
            .shipping_linked_item_ids
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
            .unwrap_or_default();

        LineItem {
            id: row.id,
            order_id: row.order_id,
            name: row.name,
            is_clothing: row.is_clothing,
            cost_cents: row.cost_cents,
            shipping_air_cost_cents: row.shipping_air_cost_cents,
            shipping_boat_cost_cents: row.shipping_boat_cost_cents,
            sample_cost_cents: row.sample_cost_cents,
            product_margin_bps_override: row.product_margin_bps_override,
            shipping_margin_bps_override: row.shipping_margin_bps_override,
            clothing_fee_cents_override: row.clothing_fee_cents_override,
            client_product_price_cents: row.client_product_price_cents,
            client_shipping_air_price_cents: row.client_shipping_air_price_cents,
            client_shipping_boat_price_cents: row.client_shipping_boat_price_cents,
            client_sample_fee_cents: row.client_sample_fee_cents,
            shipping_linked_item_ids: linked,
            shipping_link_note: row.shipping_link_note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for line item database operations.
#[derive(Debug, Clone)]
pub struct LineItemRepository {
    pool: SqlitePool,
}

impl LineItemRepository {
    /// Creates a new LineItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LineItemRepository { pool }
    }

    /// Inserts a new line item.
    pub async fn insert(&self, item: &LineItem) -> DbResult<()> {
        debug!(id = %item.id, order_id = %item.order_id, "Inserting line item");

        let linked_json = encode_linked_ids(&item.shipping_linked_item_ids)?;

        sqlx::query(
            r#"
            INSERT INTO line_items (
                id, order_id, name, is_clothing,
                cost_cents, shipping_air_cost_cents, shipping_boat_cost_cents, sample_cost_cents,
                product_margin_bps_override, shipping_margin_bps_override, clothing_fee_cents_override,
                client_product_price_cents, client_shipping_air_price_cents,
                client_shipping_boat_price_cents, client_sample_fee_cents,
                shipping_linked_item_ids, shipping_link_note,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8,
                ?9, ?10, ?11,
                ?12, ?13,
                ?14, ?15,
                ?16, ?17,
                ?18, ?19
            )
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.name)
        .bind(item.is_clothing)
        .bind(item.cost_cents)
        .bind(item.shipping_air_cost_cents)
        .bind(item.shipping_boat_cost_cents)
        .bind(item.sample_cost_cents)
        .bind(item.product_margin_bps_override)
        .bind(item.shipping_margin_bps_override)
        .bind(item.clothing_fee_cents_override)
        .bind(item.client_product_price_cents)
        .bind(item.client_shipping_air_price_cents)
        .bind(item.client_shipping_boat_price_cents)
        .bind(item.client_sample_fee_cents)
        .bind(linked_json)
        .bind(&item.shipping_link_note)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a line item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(LineItem))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LineItem>> {
        let sql = format!("SELECT {} FROM line_items WHERE id = ?1", LINE_ITEM_COLUMNS);

        let row: Option<LineItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(LineItem::from))
    }

    /// Lists all line items in an order, in creation order.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<LineItem>> {
        let sql = format!(
            "SELECT {} FROM line_items WHERE order_id = ?1 ORDER BY created_at, id",
            LINE_ITEM_COLUMNS
        );

        let rows: Vec<LineItemRow> = sqlx::query_as(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    /// Writes the manufacturer cost figures.
    pub async fn set_manufacturer_costs(
        &self,
        id: &str,
        cost_cents: i64,
        shipping_air_cost_cents: i64,
        shipping_boat_cost_cents: i64,
        sample_cost_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, cost_cents, "Writing manufacturer costs");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                cost_cents = ?2,
                shipping_air_cost_cents = ?3,
                shipping_boat_cost_cents = ?4,
                sample_cost_cents = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost_cents)
        .bind(shipping_air_cost_cents)
        .bind(shipping_boat_cost_cents)
        .bind(sample_cost_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes all four computed client price columns at once.
    ///
    /// Used by the manufacturer-cost-entry path, which recomputes every
    /// category from the current resolution in one pass.
    pub async fn update_computed_prices(
        &self,
        id: &str,
        product_price_cents: i64,
        shipping_air_price_cents: i64,
        shipping_boat_price_cents: i64,
        sample_fee_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, "Writing computed client prices");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                client_product_price_cents = ?2,
                client_shipping_air_price_cents = ?3,
                client_shipping_boat_price_cents = ?4,
                client_sample_fee_cents = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(product_price_cents)
        .bind(shipping_air_price_cents)
        .bind(shipping_boat_price_cents)
        .bind(sample_fee_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes the client product price together with the product margin
    /// override column - `None` clears the override back to "inherited".
    ///
    /// Price and flag travel in ONE statement so a concurrent writer can
    /// never observe a customized price with an inherited flag or vice
    /// versa.
    pub async fn update_product_pricing(
        &self,
        id: &str,
        price_cents: i64,
        override_bps: Option<u32>,
    ) -> DbResult<()> {
        debug!(id = %id, price_cents, ?override_bps, "Writing product pricing");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                client_product_price_cents = ?2,
                product_margin_bps_override = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(override_bps)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes the client product price together with the clothing fee
    /// override column - `None` clears back to "inherited".
    pub async fn update_clothing_pricing(
        &self,
        id: &str,
        price_cents: i64,
        override_fee_cents: Option<i64>,
    ) -> DbResult<()> {
        debug!(id = %id, price_cents, ?override_fee_cents, "Writing clothing pricing");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                client_product_price_cents = ?2,
                clothing_fee_cents_override = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price_cents)
        .bind(override_fee_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes both client shipping prices together with the shipping
    /// margin override column - `None` clears back to "inherited".
    pub async fn update_shipping_pricing(
        &self,
        id: &str,
        air_price_cents: i64,
        boat_price_cents: i64,
        override_bps: Option<u32>,
    ) -> DbResult<()> {
        debug!(id = %id, air_price_cents, boat_price_cents, ?override_bps, "Writing shipping pricing");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                client_shipping_air_price_cents = ?2,
                client_shipping_boat_price_cents = ?3,
                shipping_margin_bps_override = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(air_price_cents)
        .bind(boat_price_cents)
        .bind(override_bps)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes the computed client sample fee. There is no sample override
    /// column at the item layer, so only the fee travels.
    pub async fn update_sample_fee(&self, id: &str, fee_cents: i64) -> DbResult<()> {
        debug!(id = %id, fee_cents, "Writing sample fee");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                client_sample_fee_cents = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(fee_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes the primary side of a shipping link: the covered sibling ids
    /// (as JSON) and the human-readable note. An empty slice clears both
    /// columns to NULL (un-link).
    pub async fn set_shipping_link(
        &self,
        id: &str,
        linked_item_ids: &[String],
        note: Option<&str>,
    ) -> DbResult<()> {
        debug!(id = %id, linked = linked_item_ids.len(), "Writing shipping link");

        let linked_json = encode_linked_ids(linked_item_ids)?;

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                shipping_linked_item_ids = ?2,
                shipping_link_note = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(linked_json)
        .bind(note)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

    /// Writes the covered side of a shipping link: zeroes the item's own
    /// manufacturer shipping costs AND client shipping prices, and records
    /// a note naming the covering primary.
    pub async fn zero_covered_shipping(&self, id: &str, note: &str) -> DbResult<()> {
        debug!(id = %id, "Zeroing covered shipping");

        let result = sqlx::query(
            r#"
            UPDATE line_items SET
                shipping_air_cost_cents = 0,
                shipping_boat_cost_cents = 0,
                client_shipping_air_price_cents = 0,
                client_shipping_boat_price_cents = 0,
                shipping_link_note = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(note)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("LineItem", id));
        }

        Ok(())
    }

}

/// Encodes the linked-id list for storage: JSON text, or NULL when empty.
fn encode_linked_ids(ids: &[String]) -> DbResult<Option<String>> {
    if ids.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_string(ids).map_err(|e| DbError::Internal(e.to_string()))?;
    Ok(Some(json))
}

/// Helper to generate a new line item ID.
pub fn generate_line_item_id() -> String {
    Uuid::new_v4().to_string()
}
