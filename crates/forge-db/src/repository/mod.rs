//! # Repository Module
//!
//! Repository implementations for database access.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Pattern                                  │
//! │                                                                         │
//! │  forge-pricing engine                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository (this module) ← SQL lives here, nowhere else               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePool → SQLite                                                   │
//! │                                                                         │
//! │  One repository per table; targeted single-statement updates for       │
//! │  each mutation the engine performs.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod accessory;
pub mod client_override;
pub mod line_item;
pub mod order;
pub mod order_margin;
pub mod pricing_defaults;
