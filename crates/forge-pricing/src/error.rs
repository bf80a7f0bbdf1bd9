//! # Pricing Error Types
//!
//! Error types for engine-level pricing operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Not Found     │  │  Link Conflict  │  │     Wrapped             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  OrderNotFound  │  │  SelfLink       │  │  Validation             │ │
//! │  │  LineItemNot-   │  │  CrossOrderLink │  │  Core                   │ │
//! │  │  Found          │  │  AlreadyCovered │  │  Database               │ │
//! │  │                 │  │  NestedLink     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Validation and link-conflict errors fire BEFORE any write: no        │
//! │  partial state. Database errors inside bulk loops are handled by      │
//! │  the loop (warn + skip + count), never surfaced as an abort.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use forge_core::{CoreError, ValidationError};
use forge_db::DbError;

/// Result type alias for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Pricing engine error type.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum PricingError {
    // =========================================================================
    // Not Found
    // =========================================================================
    /// The order does not exist.
    #[error("Order not found: {id}")]
    OrderNotFound { id: String },

    /// The line item does not exist.
    #[error("Line item not found: {id}")]
    LineItemNotFound { id: String },

    // =========================================================================
    // Shipping Link Conflicts
    // =========================================================================
    /// A primary item cannot cover its own shipping.
    #[error("Item {id} cannot cover its own shipping")]
    SelfLink { id: String },

    /// A covered item must belong to the primary's order.
    #[error("Item {covered_id} belongs to a different order than primary {primary_id}")]
    CrossOrderLink {
        primary_id: String,
        covered_id: String,
    },

    /// A covered item is already covered by a different primary.
    #[error("Item {covered_id} is already covered by primary {primary_id}")]
    AlreadyCovered {
        covered_id: String,
        primary_id: String,
    },

    /// A covered item is itself a covering primary.
    #[error("Item {covered_id} covers other items and cannot itself be covered")]
    NestedLink { covered_id: String },

    // =========================================================================
    // Override Edits
    // =========================================================================
    /// The override kind does not apply to this item: a clothing fee on a
    /// non-clothing item, or a product margin on a clothing item.
    #[error("Override for {category} does not apply to item {item_id}")]
    OverrideNotApplicable { item_id: String, category: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// Input validation failed (rejected before any write).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Core pricing logic error.
    #[error("Pricing error: {0}")]
    Core(#[from] CoreError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

// =============================================================================
// Error Categorization
// =============================================================================

impl PricingError {
    /// Returns true if this error is an up-front input rejection: nothing
    /// was written and the caller should fix the input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PricingError::Validation(_)
                | PricingError::SelfLink { .. }
                | PricingError::CrossOrderLink { .. }
                | PricingError::AlreadyCovered { .. }
                | PricingError::NestedLink { .. }
                | PricingError::OverrideNotApplicable { .. }
        )
    }

    /// Returns true if this error means a referenced record is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PricingError::OrderNotFound { .. } | PricingError::LineItemNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_categorization() {
        assert!(PricingError::SelfLink { id: "a".into() }.is_validation());
        assert!(PricingError::AlreadyCovered {
            covered_id: "b".into(),
            primary_id: "a".into()
        }
        .is_validation());

        assert!(!PricingError::OrderNotFound { id: "o".into() }.is_validation());
        assert!(PricingError::OrderNotFound { id: "o".into() }.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = PricingError::AlreadyCovered {
            covered_id: "item-b".into(),
            primary_id: "item-a".into(),
        };
        assert!(err.to_string().contains("item-b"));
        assert!(err.to_string().contains("item-a"));
    }
}
