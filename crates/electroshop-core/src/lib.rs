//! # electroshop-core: Pure Business Logic for ElectroShop
//!
//! This crate is the **heart** of ElectroShop. It contains the storefront's
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ElectroShop Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront / Admin UI                        │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Order history / Admin      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/storefront (axum)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ electroshop-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌─────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │  money  │ │   cart    │ │promotion│ │ order  │ │   │
//! │  │   └─────────┘ └─────────┘ └───────────┘ └─────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 electroshop-db (Database Layer)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Promotion, Review, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart container and its persisted snapshot
//! - [`promotion`] - Coupon validation and discount computation
//! - [`order`] - Order lifecycle rules and checkout totals
//! - [`filters`] - Listing filters shared by the repositories
//! - [`stats`] - Dashboard aggregate shapes
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use electroshop_core::money::Money;
//!
//! let subtotal = Money::from_cents(10_000); // €100.00
//! let discount = subtotal.percentage(1_500); // 15%
//! assert_eq!(discount.cents(), 1_500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod filters;
pub mod money;
pub mod order;
pub mod promotion;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartRestoreError, CartSnapshot, CartStorage, PersistentCart};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use promotion::{PromotionOutcome, PromotionRejection};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// Guards against typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price a product or cart entry may carry (€1,000,000).
///
/// Keeps `MAX_ITEM_QUANTITY × price` summed over `MAX_CART_ITEMS` far
/// inside i64.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Default currency for payment intents (ISO 4217, lowercase as the
/// processor expects).
pub const DEFAULT_CURRENCY: &str = "eur";

/// Flat shipping fee applied to non-empty orders, in cents.
pub const DEFAULT_SHIPPING_CENTS: i64 = 599;

/// Maximum number of related products returned for a product page.
pub const RELATED_PRODUCTS_LIMIT: i64 = 4;
