//! # Review Repository
//!
//! Reviews are created `pending` and only count once approved. Every
//! moderation change recomputes the product's `rating` and `review_count`
//! in the same transaction, so the catalog never disagrees with the
//! approved reviews.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use electroshop_core::filters::{search_term, ReviewFilter};
use electroshop_core::stats::{round_rating, ReviewStats};
use electroshop_core::{NewReview, Review, ReviewStatus};

use super::like_pattern;
use crate::error::{DbError, DbResult};

const REVIEW_COLUMNS: &str =
    "id, product_id, user_id, user_name, rating, comment, status, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: String,
    product_id: String,
    user_id: String,
    user_name: String,
    rating: i64,
    comment: String,
    status: ReviewStatus,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            user_name: row.user_name,
            rating: row.rating,
            comment: row.comment,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Recomputes a product's rating summary from its approved reviews.
async fn refresh_product_rating(conn: &mut SqliteConnection, product_id: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE products SET
            rating = COALESCE((
                SELECT ROUND(AVG(rating), 1) FROM reviews
                WHERE product_id = ?1 AND status = 'approved'
            ), 0),
            review_count = (
                SELECT COUNT(*) FROM reviews
                WHERE product_id = ?1 AND status = 'approved'
            )
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Lists reviews for moderation, newest first.
    pub async fn list(&self, filter: &ReviewFilter) -> DbResult<Vec<Review>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM reviews WHERE 1 = 1",
            REVIEW_COLUMNS
        ));

        if let Some(product_id) = filter.product_id.as_deref().filter(|p| !p.is_empty()) {
            qb.push(" AND product_id = ").push_bind(product_id.to_string());
        }
        if let Some(user_id) = filter.user_id.as_deref().filter(|u| !u.is_empty()) {
            qb.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (LOWER(comment) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(user_name) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<ReviewRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Approved reviews of a product, newest first.
    pub async fn approved_for_product(&self, product_id: &str) -> DbResult<Vec<Review>> {
        self.list(&ReviewFilter {
            product_id: Some(product_id.to_string()),
            status: Some(ReviewStatus::Approved),
            ..Default::default()
        })
        .await
    }

    /// All reviews written by a user, whatever their status.
    pub async fn for_user(&self, user_id: &str) -> DbResult<Vec<Review>> {
        self.list(&ReviewFilter {
            user_id: Some(user_id.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn get(&self, id: &str) -> DbResult<Review> {
        let sql = format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS);

        sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Review::from)
            .ok_or_else(|| DbError::not_found("Review", id))
    }

    /// Submits a review. It stays invisible until approved.
    pub async fn insert(&self, product_id: &str, input: &NewReview) -> DbResult<Review> {
        let id = Uuid::new_v4().to_string();

        debug!(id = %id, product_id = %product_id, rating = input.rating, "Inserting review");

        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, user_name, rating, comment, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(product_id)
        .bind(&input.user_id)
        .bind(input.user_name.trim())
        .bind(input.rating)
        .bind(input.comment.trim())
        .bind(ReviewStatus::Pending)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(&id).await
    }

    /// Moderates a review and refreshes the product's rating summary.
    pub async fn set_status(&self, id: &str, status: ReviewStatus) -> DbResult<Review> {
        debug!(id = %id, ?status, "Moderating review");

        let mut tx = self.pool.begin().await?;

        let product_id: Option<String> =
            sqlx::query_scalar("UPDATE reviews SET status = ?2 WHERE id = ?1 RETURNING product_id")
                .bind(id)
                .bind(status)
                .fetch_optional(&mut *tx)
                .await?;

        let product_id = product_id.ok_or_else(|| DbError::not_found("Review", id))?;
        refresh_product_rating(&mut *tx, &product_id).await?;

        tx.commit().await?;

        self.get(id).await
    }

    /// Deletes a review and refreshes the product's rating summary.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting review");

        let mut tx = self.pool.begin().await?;

        let product_id: Option<String> =
            sqlx::query_scalar("DELETE FROM reviews WHERE id = ?1 RETURNING product_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let product_id = product_id.ok_or_else(|| DbError::not_found("Review", id))?;
        refresh_product_rating(&mut *tx, &product_id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Review aggregates for the dashboard.
    pub async fn stats(&self) -> DbResult<ReviewStats> {
        let (total, pending, average): (i64, i64, f64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
                COALESCE(AVG(CASE WHEN status = 'approved' THEN rating END), 0.0)
            FROM reviews
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ReviewStats {
            total,
            pending,
            average_rating: round_rating(average),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{new_user, seeded_db};

    fn review(user_id: &str, rating: i64) -> NewReview {
        NewReview {
            user_id: user_id.to_string(),
            user_name: "Marie".to_string(),
            rating,
            comment: "Très bon produit".to_string(),
        }
    }

    #[tokio::test]
    async fn test_moderation_updates_product_rating() {
        let db = seeded_db().await;
        let user = db
            .users()
            .insert(&new_user("Marie", "marie@example.com"))
            .await
            .unwrap();

        let five = db.reviews().insert("galaxy-s23", &review(&user.id, 5)).await.unwrap();
        let four = db.reviews().insert("galaxy-s23", &review(&user.id, 4)).await.unwrap();
        assert_eq!(five.status, ReviewStatus::Pending);

        // Pending reviews are invisible
        assert!(db.reviews().approved_for_product("galaxy-s23").await.unwrap().is_empty());
        assert_eq!(db.products().get("galaxy-s23").await.unwrap().review_count, 0);

        db.reviews().set_status(&five.id, ReviewStatus::Approved).await.unwrap();
        db.reviews().set_status(&four.id, ReviewStatus::Approved).await.unwrap();

        let product = db.products().get("galaxy-s23").await.unwrap();
        assert_eq!(product.review_count, 2);
        assert_eq!(product.rating, 4.5);

        db.reviews().set_status(&four.id, ReviewStatus::Rejected).await.unwrap();
        let product = db.products().get("galaxy-s23").await.unwrap();
        assert_eq!(product.review_count, 1);
        assert_eq!(product.rating, 5.0);

        db.reviews().delete(&five.id).await.unwrap();
        let product = db.products().get("galaxy-s23").await.unwrap();
        assert_eq!(product.review_count, 0);
        assert_eq!(product.rating, 0.0);
    }

    #[tokio::test]
    async fn test_filters_and_stats() {
        let db = seeded_db().await;
        let user = db
            .users()
            .insert(&new_user("Paul", "paul@example.com"))
            .await
            .unwrap();

        let r = db.reviews().insert("airpods-pro", &review(&user.id, 3)).await.unwrap();
        db.reviews().insert("galaxy-s23", &review(&user.id, 5)).await.unwrap();
        db.reviews().set_status(&r.id, ReviewStatus::Approved).await.unwrap();

        assert_eq!(db.reviews().for_user(&user.id).await.unwrap().len(), 2);

        let pending = db
            .reviews()
            .list(&ReviewFilter {
                status: Some(ReviewStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);

        let stats = db.reviews().stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.average_rating, 3.0);
    }

    #[tokio::test]
    async fn test_missing_review() {
        let db = seeded_db().await;
        let err = db
            .reviews()
            .set_status("nope", ReviewStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
