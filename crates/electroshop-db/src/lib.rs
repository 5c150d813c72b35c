//! # electroshop-db: Database Layer for ElectroShop
//!
//! SQLite persistence for the storefront, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ElectroShop Data Flow                              │
//! │                                                                         │
//! │  axum handler (GET /api/products)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  electroshop-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo    │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ PromotionRepo  │    │ 002_indexes  │  │   │
//! │  │   │               │    │ OrderRepo  ... │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (ELECTROSHOP_DATABASE_PATH)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories and the checkout store traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use electroshop_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./electroshop.db")).await?;
//!
//! let promo = db.promotions().get_by_code("welcome10").await?;
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

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CategoryRepository, OrderRepository, OrderStore, ProductRepository, ProductStore,
    PromotionRepository, PromotionStore, ReviewRepository, UserRepository,
};
