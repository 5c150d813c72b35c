//! # Product Repository
//!
//! Database operations for catalog products.
//!
//! ## Listing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    GET /api/products?…                                  │
//! │                                                                         │
//! │  ProductFilter                                                         │
//! │  ├── category  → AND p.category_id = ?                                 │
//! │  ├── search    → AND (name | description | category name) LIKE ?       │
//! │  ├── featured  → AND (discount_percent > 0 OR rating >= 4.5)           │
//! │  ├── sort      → ORDER BY price / rating / created_at                  │
//! │  └── limit     → LIMIT ? (clamped)                                     │
//! │                                                                         │
//! │  One QueryBuilder statement, bound parameters only.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use electroshop_core::filters::{clamp_limit, search_term, ProductFilter, ProductSort};
use electroshop_core::stats::ProductStats;
use electroshop_core::{NewProduct, Product, Specification, FEATURED_RATING};

use super::{like_pattern, ProductStore};
use crate::error::{DbError, DbResult};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.full_description, \
     p.price_cents, p.old_price_cents, p.discount_percent, p.image, p.category_id, \
     p.in_stock, p.rating, p.review_count, p.specifications, p.created_at, p.updated_at";

/// Default page size for catalog listings.
const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    full_description: Option<String>,
    price_cents: i64,
    old_price_cents: Option<i64>,
    discount_percent: i64,
    image: String,
    category_id: String,
    in_stock: bool,
    rating: f64,
    review_count: i64,
    specifications: Json<Vec<Specification>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            full_description: row.full_description,
            price_cents: row.price_cents,
            old_price_cents: row.old_price_cents,
            discount_percent: row.discount_percent,
            image: row.image,
            category_id: row.category_id,
            in_stock: row.in_stock,
            rating: row.rating,
            review_count: row.review_count,
            specifications: row.specifications.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let phones = repo
///     .list(&ProductFilter { category: Some("smartphones".into()), ..Default::default() })
///     .await?;
/// let product = repo.get("samsung-galaxy-s23").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products matching the filter.
    ///
    /// Search is case-insensitive over name, description and category name.
    /// Without an explicit sort, products come back by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM products p JOIN categories c ON c.id = p.category_id WHERE 1 = 1",
            PRODUCT_COLUMNS
        ));

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            qb.push(" AND p.category_id = ").push_bind(category.to_string());
        }

        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (LOWER(p.name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(p.description) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(c.name) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if filter.featured == Some(true) {
            qb.push(" AND (p.discount_percent > 0 OR p.rating >= ")
                .push_bind(FEATURED_RATING)
                .push(")");
        }

        qb.push(match filter.sort {
            Some(ProductSort::PriceAsc) => " ORDER BY p.price_cents ASC, p.name ASC",
            Some(ProductSort::PriceDesc) => " ORDER BY p.price_cents DESC, p.name ASC",
            Some(ProductSort::Rating) => " ORDER BY p.rating DESC, p.review_count DESC",
            Some(ProductSort::Newest) => " ORDER BY p.created_at DESC",
            None => " ORDER BY p.name ASC",
        });

        qb.push(" LIMIT ")
            .push_bind(clamp_limit(filter.limit, DEFAULT_LIMIT));

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by ID.
    pub async fn find(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products p WHERE p.id = ?1", PRODUCT_COLUMNS);

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Gets a product by ID, failing with NotFound when absent.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Gets every product whose id is in `ids`.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM products p WHERE p.id IN (",
            PRODUCT_COLUMNS
        ));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Products in the same category, excluding the product itself.
    ///
    /// Best rated first, at most `limit`.
    pub async fn related(&self, id: &str, limit: i64) -> DbResult<Vec<Product>> {
        let product = self.get(id).await?;

        let sql = format!(
            "SELECT {} FROM products p \
             WHERE p.category_id = ?1 AND p.id != ?2 \
             ORDER BY p.rating DESC, p.name ASC \
             LIMIT ?3",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&product.category_id)
            .bind(&product.id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Inserts a new product.
    ///
    /// Rating and review count start at zero; they are maintained by
    /// review moderation.
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        let id = input
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();

        debug!(id = %id, name = %input.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, full_description,
                price_cents, old_price_cents, discount_percent,
                image, category_id, in_stock,
                rating, review_count, specifications,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10,
                0, 0, ?11,
                ?12, ?12
            )
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(input.description.trim())
        .bind(&input.full_description)
        .bind(input.price_cents)
        .bind(input.old_price_cents)
        .bind(input.discount_percent)
        .bind(&input.image)
        .bind(&input.category_id)
        .bind(input.in_stock)
        .bind(Json(&input.specifications))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(&id).await
    }

    /// Replaces a product's editable fields.
    pub async fn update(&self, id: &str, input: &NewProduct) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                full_description = ?4,
                price_cents = ?5,
                old_price_cents = ?6,
                discount_percent = ?7,
                image = ?8,
                category_id = ?9,
                in_stock = ?10,
                specifications = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(input.description.trim())
        .bind(&input.full_description)
        .bind(input.price_cents)
        .bind(input.old_price_cents)
        .bind(input.discount_percent)
        .bind(&input.image)
        .bind(&input.category_id)
        .bind(input.in_stock)
        .bind(Json(&input.specifications))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get(id).await
    }

    /// Deletes a product and its reviews.
    ///
    /// Order items keep their snapshot, so order history is unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (used by the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Catalog aggregates for the dashboard.
    pub async fn stats(&self) -> DbResult<ProductStats> {
        let (total, out_of_stock, catalog_value_cents): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN in_stock = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(price_cents), 0)
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ProductStats {
            total,
            out_of_stock,
            catalog_value_cents,
        })
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.find(id).await
    }

    async fn find_products(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        self.get_many(ids).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
