//! # forge-db: Database Layer for Forge Orders
//!
//! This crate provides database access for the Forge Orders system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Forge Orders Data Flow                            │
//! │                                                                         │
//! │  forge-pricing engine (recalculate, link shipping, propagate)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     forge-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (line_item,   │    │  (embedded)  │  │   │
//! │  │   │               │    │  order_margin │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  defaults...) │    │ 001_init.sql │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (forge.db)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (line items, margins, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forge_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/forge.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let items = db.line_items().list_by_order("order-id").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::accessory::AccessoryRepository;
pub use repository::client_override::ClientOverrideRepository;
pub use repository::line_item::LineItemRepository;
pub use repository::order::OrderRepository;
pub use repository::order_margin::OrderMarginRepository;
pub use repository::pricing_defaults::PricingDefaultsRepository;
