//! # forge-pricing: Margin Resolution + Price Propagation Engine
//!
//! This crate orchestrates pricing over persisted records: bulk
//! recalculation by category, shared-shipping allocation, and the
//! single-item/order-level propagation paths.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Forge Orders Pricing Layer                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 forge-pricing (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────────┐  ┌───────────────┐  ┌────────────────────┐  │   │
//! │  │  │Recalculation  │  │  Shipping     │  │  PricePropagator   │  │   │
//! │  │  │Engine         │  │  Allocator    │  │                    │  │   │
//! │  │  │               │  │               │  │  Cost submission,  │  │   │
//! │  │  │ 5 category    │  │ link / unlink │  │  order margin edit,│  │   │
//! │  │  │ passes, skip+ │  │ cover sibling │  │  item override     │  │   │
//! │  │  │ count failures│  │ shipping      │  │  edit              │  │   │
//! │  │  └───────┬───────┘  └───────┬───────┘  └─────────┬──────────┘  │   │
//! │  │          │                  │                    │             │   │
//! │  │          └─────────────┬────┴────────────────────┘             │   │
//! │  │                        ▼                                       │   │
//! │  │    forge-core: resolve_rate + compute_client_price             │   │
//! │  │    (the ONE resolution + calculation pair, no copies)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Bulk recalculation across chosen categories
//! - [`shipping`] - Shipping link/unlink with pre-zero snapshots
//! - [`propagate`] - Cost-entry, order-edit and item-edit paths
//! - [`error`] - Engine error types

// =============================================================================
// Module Declarations
// =============================================================================

mod context;

pub mod engine;
pub mod error;
pub mod propagate;
pub mod shipping;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{
    CategorySelection, RecalculationEngine, RecalculationRequest, RecalculationSummary,
};
pub use error::{PricingError, PricingResult};
pub use propagate::{ItemOverride, ManufacturerCosts, PricePropagator};
pub use shipping::{CoveredItemSnapshot, ShippingAllocator, ShippingLinkReport};
