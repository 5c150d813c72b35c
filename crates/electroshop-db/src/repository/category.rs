//! # Category Repository
//!
//! Categories are keyed by slug. `product_count` is computed on read,
//! never stored.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use electroshop_core::{Category, NewCategory};

use crate::error::{DbError, DbResult};

const CATEGORY_SELECT: &str = r#"
    SELECT
        c.id, c.name, c.description, c.image,
        (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count,
        c.created_at, c.updated_at
    FROM categories c
"#;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    description: String,
    image: Option<String>,
    product_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            image: row.image,
            product_count: row.product_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let sql = format!("{} ORDER BY c.name ASC", CATEGORY_SELECT);

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Gets a category by slug.
    pub async fn get(&self, id: &str) -> DbResult<Category> {
        let sql = format!("{} WHERE c.id = ?1", CATEGORY_SELECT);

        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Inserts a new category. Duplicate slugs fail with a unique violation.
    pub async fn insert(&self, input: &NewCategory) -> DbResult<Category> {
        let now = Utc::now();

        debug!(id = %input.id, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, image, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&input.id)
        .bind(input.name.trim())
        .bind(input.description.trim())
        .bind(&input.image)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &input.id),
            other => other,
        })?;

        self.get(&input.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::seeded_db;

    #[tokio::test]
    async fn test_list_with_counts() {
        let db = seeded_db().await;
        let categories = db.categories().list().await.unwrap();

        assert_eq!(categories.len(), 3);
        let phones = categories.iter().find(|c| c.id == "smartphones").unwrap();
        assert_eq!(phones.product_count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug() {
        let db = seeded_db().await;
        let err = db
            .categories()
            .insert(&NewCategory {
                id: "audio".to_string(),
                name: "Audio bis".to_string(),
                description: String::new(),
                image: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { value, .. } if value == "audio"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = seeded_db().await;
        assert!(matches!(
            db.categories().get("drones").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
