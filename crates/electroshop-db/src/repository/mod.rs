//! # Repository Module
//!
//! Database repository implementations for ElectroShop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler / CheckoutService                                        │
//! │       │                                                                 │
//! │       │  db.products().get("samsung-galaxy-s23")                       │
//! │       ▼                                                                 │
//! │  ProductRepository ──implements──► ProductStore (trait)                │
//! │  PromotionRepository ─implements─► PromotionStore (trait)              │
//! │  OrderRepository ────implements──► OrderStore (trait)                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checkout path depends only on the three `*Store` traits, so it can
//! run against in-memory fakes in tests.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog listing, search, CRUD, stats
//! - [`CategoryRepository`] - Categories with derived product counts
//! - [`PromotionRepository`] - Coupon codes and their usage counters
//! - [`OrderRepository`] - Orders, line items, lifecycle updates
//! - [`ReviewRepository`] - Reviews and product rating maintenance
//! - [`UserRepository`] - Customer and admin accounts

use async_trait::async_trait;

use electroshop_core::{Order, Product, Promotion};

use crate::error::DbResult;

pub mod category;
pub mod order;
pub mod product;
pub mod promotion;
pub mod review;
pub mod user;

pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use promotion::PromotionRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;

// =============================================================================
// Store Traits
// =============================================================================

/// Product lookups needed to price a cart.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Returns the product with this id, if any.
    async fn find_product(&self, id: &str) -> DbResult<Option<Product>>;

    /// Returns the subset of `ids` that exist, in no particular order.
    async fn find_products(&self, ids: &[String]) -> DbResult<Vec<Product>>;
}

/// Promotion lookup by customer-entered code.
#[async_trait]
pub trait PromotionStore: Send + Sync {
    /// Looks a promotion up by code, ignoring case and surrounding spaces.
    async fn find_by_code(&self, code: &str) -> DbResult<Option<Promotion>>;
}

/// Order persistence for checkout.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order with its items.
    ///
    /// When `promotion_id` is given, the promotion's usage counter is
    /// incremented in the same transaction; if the promotion is no longer
    /// redeemable the whole write is rolled back with
    /// [`DbError::Conflict`](crate::DbError::Conflict).
    async fn place_order(&self, order: &Order, promotion_id: Option<&str>) -> DbResult<()>;
}

// =============================================================================
// Shared Query Helpers
// =============================================================================

/// Builds a `%term%` LIKE pattern for an already-lowercased search term.
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

// =============================================================================
// Test Fixtures
// =============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, Utc};

    use electroshop_core::money::Money;
    use electroshop_core::order::{build_order, subtotal, CustomerDetails, OrderTotals, PricedLine};
    use electroshop_core::{Discount, NewCategory, NewProduct, NewPromotion, NewUser, Order, UserRole};

    use crate::{Database, DbConfig};

    /// In-memory database with three categories and one product in each.
    pub async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for (id, name) in [
            ("smartphones", "Smartphones"),
            ("audio", "Audio"),
            ("tablettes", "Tablettes"),
        ] {
            db.categories()
                .insert(&NewCategory {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: String::new(),
                    image: None,
                })
                .await
                .unwrap();
        }

        db.products()
            .insert(&new_product("galaxy-s23", "Samsung Galaxy S23", 84_900))
            .await
            .unwrap();

        let mut airpods = new_product("airpods-pro", "AirPods Pro", 27_900);
        airpods.category_id = "audio".to_string();
        airpods.description = "Écouteurs sans fil".to_string();
        db.products().insert(&airpods).await.unwrap();

        let mut ipad = new_product("ipad-air", "iPad Air", 69_900);
        ipad.category_id = "tablettes".to_string();
        ipad.description = "Tablette 11 pouces".to_string();
        db.products().insert(&ipad).await.unwrap();

        db
    }

    /// An in-stock smartphone with no discount.
    pub fn new_product(id: &str, name: &str, price_cents: i64) -> NewProduct {
        NewProduct {
            id: Some(id.to_string()),
            name: name.to_string(),
            description: "Smartphone".to_string(),
            full_description: None,
            price_cents,
            old_price_cents: None,
            discount_percent: 0,
            image: format!("/images/{}.jpg", id),
            category_id: "smartphones".to_string(),
            in_stock: true,
            specifications: Vec::new(),
        }
    }

    /// An active, unlimited, unscoped promotion valid for the next month.
    pub fn new_promotion(code: &str, discount: Discount) -> NewPromotion {
        let now = Utc::now();
        NewPromotion {
            code: code.to_string(),
            description: None,
            discount,
            minimum_purchase_cents: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(30),
            usage_limit: 0,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
        }
    }

    pub fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            image: None,
            role: UserRole::User,
        }
    }

    /// One Galaxy S23 and two AirPods, shipped to Paris.
    pub fn sample_order(user_id: Option<String>, promotion_code: Option<&str>) -> Order {
        let lines = vec![
            PricedLine {
                product_id: "galaxy-s23".to_string(),
                name: "Samsung Galaxy S23".to_string(),
                category_id: "smartphones".to_string(),
                unit_price: Money::from_cents(84_900),
                quantity: 1,
            },
            PricedLine {
                product_id: "airpods-pro".to_string(),
                name: "AirPods Pro".to_string(),
                category_id: "audio".to_string(),
                unit_price: Money::from_cents(27_900),
                quantity: 2,
            },
        ];
        let totals = OrderTotals::compute(subtotal(&lines), Money::zero(), Money::from_cents(599));
        let customer = CustomerDetails {
            name: "Jean Dupont".to_string(),
            email: "jean@example.com".to_string(),
            address: "12 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75002".to_string(),
            country: "France".to_string(),
        };

        build_order(
            &customer,
            user_id,
            &lines,
            totals,
            promotion_code.map(str::to_string),
            Utc::now(),
        )
    }
}
