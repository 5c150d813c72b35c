//! # Promotion Repository
//!
//! Coupon codes and their redemption counters.
//!
//! Codes are stored uppercase and looked up through
//! [`normalize_code`], so `welcome10` finds `WELCOME10`. The usage counter
//! is only ever incremented by [`OrderRepository`](super::OrderRepository)
//! inside the order transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use electroshop_core::filters::{search_term, PromotionFilter};
use electroshop_core::promotion::{normalize_code, PromotionPhase};
use electroshop_core::{Discount, DiscountKind, NewPromotion, Promotion};

use super::{like_pattern, PromotionStore};
use crate::error::{DbError, DbResult};

const PROMOTION_COLUMNS: &str = "id, code, description, discount_kind, discount_value, \
     minimum_purchase_cents, valid_from, valid_until, usage_limit, usage_count, \
     product_ids, category_ids, active, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: String,
    code: String,
    description: Option<String>,
    discount_kind: DiscountKind,
    discount_value: i64,
    minimum_purchase_cents: i64,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    usage_limit: i64,
    usage_count: i64,
    product_ids: Json<Vec<String>>,
    category_ids: Json<Vec<String>>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PromotionRow> for Promotion {
    type Error = DbError;

    fn try_from(row: PromotionRow) -> Result<Self, Self::Error> {
        let discount = Discount::from_parts(row.discount_kind, row.discount_value).ok_or_else(
            || {
                DbError::InvalidData(format!(
                    "promotion {} has discount value {} out of range",
                    row.id, row.discount_value
                ))
            },
        )?;

        Ok(Promotion {
            id: row.id,
            code: row.code,
            description: row.description,
            discount,
            minimum_purchase_cents: row.minimum_purchase_cents,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count,
            product_ids: row.product_ids.0,
            category_ids: row.category_ids.0,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_promotions(rows: Vec<PromotionRow>) -> DbResult<Vec<Promotion>> {
    rows.into_iter().map(Promotion::try_from).collect()
}

/// Repository for promotion database operations.
#[derive(Debug, Clone)]
pub struct PromotionRepository {
    pool: SqlitePool,
}

impl PromotionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromotionRepository { pool }
    }

    /// Lists promotions, newest first.
    ///
    /// The phase filter is evaluated against `now`, matching
    /// [`PromotionPhase::of`].
    pub async fn list(&self, filter: &PromotionFilter, now: DateTime<Utc>) -> DbResult<Vec<Promotion>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM promotions WHERE 1 = 1",
            PROMOTION_COLUMNS
        ));

        match filter.status {
            Some(PromotionPhase::Inactive) => {
                qb.push(" AND active = 0");
            }
            Some(PromotionPhase::Upcoming) => {
                qb.push(" AND active = 1 AND valid_from > ").push_bind(now);
            }
            Some(PromotionPhase::Expired) => {
                qb.push(" AND active = 1 AND valid_until < ").push_bind(now);
            }
            Some(PromotionPhase::Active) => {
                qb.push(" AND active = 1 AND valid_from <= ")
                    .push_bind(now)
                    .push(" AND valid_until >= ")
                    .push_bind(now);
            }
            None => {}
        }

        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (LOWER(code) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(COALESCE(description, '')) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC, code ASC");

        let rows = qb
            .build_query_as::<PromotionRow>()
            .fetch_all(&self.pool)
            .await?;

        into_promotions(rows)
    }

    /// Gets a promotion by ID.
    pub async fn get(&self, id: &str) -> DbResult<Promotion> {
        let sql = format!("SELECT {} FROM promotions WHERE id = ?1", PROMOTION_COLUMNS);

        let row = sqlx::query_as::<_, PromotionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Promotion", id))?;

        Promotion::try_from(row)
    }

    /// Looks a promotion up by customer-entered code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Promotion>> {
        let sql = format!("SELECT {} FROM promotions WHERE code = ?1", PROMOTION_COLUMNS);

        sqlx::query_as::<_, PromotionRow>(&sql)
            .bind(normalize_code(code))
            .fetch_optional(&self.pool)
            .await?
            .map(Promotion::try_from)
            .transpose()
    }

    /// Inserts a new promotion with a zero usage count.
    pub async fn insert(&self, input: &NewPromotion) -> DbResult<Promotion> {
        let id = Uuid::new_v4().to_string();
        let code = normalize_code(&input.code);
        let now = Utc::now();

        debug!(id = %id, code = %code, "Inserting promotion");

        sqlx::query(
            r#"
            INSERT INTO promotions (
                id, code, description, discount_kind, discount_value,
                minimum_purchase_cents, valid_from, valid_until,
                usage_limit, usage_count, product_ids, category_ids, active,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, 0, ?10, ?11, ?12,
                ?13, ?13
            )
            "#,
        )
        .bind(&id)
        .bind(&code)
        .bind(&input.description)
        .bind(input.discount.kind())
        .bind(input.discount.value())
        .bind(input.minimum_purchase_cents)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.usage_limit)
        .bind(Json(&input.product_ids))
        .bind(Json(&input.category_ids))
        .bind(input.active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        self.get(&id).await
    }

    /// Replaces a promotion's rules. The usage count is preserved.
    pub async fn update(&self, id: &str, input: &NewPromotion) -> DbResult<Promotion> {
        let code = normalize_code(&input.code);

        debug!(id = %id, code = %code, "Updating promotion");

        let result = sqlx::query(
            r#"
            UPDATE promotions SET
                code = ?2,
                description = ?3,
                discount_kind = ?4,
                discount_value = ?5,
                minimum_purchase_cents = ?6,
                valid_from = ?7,
                valid_until = ?8,
                usage_limit = ?9,
                product_ids = ?10,
                category_ids = ?11,
                active = ?12,
                updated_at = ?13
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&code)
        .bind(&input.description)
        .bind(input.discount.kind())
        .bind(input.discount.value())
        .bind(input.minimum_purchase_cents)
        .bind(input.valid_from)
        .bind(input.valid_until)
        .bind(input.usage_limit)
        .bind(Json(&input.product_ids))
        .bind(Json(&input.category_ids))
        .bind(input.active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Promotion", id));
        }

        self.get(id).await
    }

    /// Deletes a promotion. Orders keep the redeemed code as text.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Promotion", id));
        }

        Ok(())
    }
}

fn duplicate_code(err: sqlx::Error, code: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("code", code),
        other => other,
    }
}

#[async_trait]
impl PromotionStore for PromotionRepository {
    async fn find_by_code(&self, code: &str) -> DbResult<Option<Promotion>> {
        self.get_by_code(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{new_promotion, seeded_db};
    use chrono::Duration;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let db = seeded_db().await;
        db.promotions()
            .insert(&new_promotion("welcome10", Discount::Percentage { bps: 1_000 }))
            .await
            .unwrap();

        let found = db.promotions().get_by_code("  Welcome10 ").await.unwrap();
        let promo = found.unwrap();
        assert_eq!(promo.code, "WELCOME10");
        assert_eq!(promo.usage_count, 0);
        assert_eq!(promo.discount, Discount::Percentage { bps: 1_000 });

        assert!(db.promotions().get_by_code("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let db = seeded_db().await;
        let input = new_promotion("SUMMER2023", Discount::FixedAmount { cents: 500 });
        db.promotions().insert(&input).await.unwrap();

        let err = db.promotions().insert(&input).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { value, .. } if value == "SUMMER2023"));
    }

    #[tokio::test]
    async fn test_list_by_phase_and_search() {
        let db = seeded_db().await;
        let now = Utc::now();

        db.promotions()
            .insert(&new_promotion("LIVE10", Discount::Percentage { bps: 1_000 }))
            .await
            .unwrap();

        let mut upcoming = new_promotion("SOON20", Discount::Percentage { bps: 2_000 });
        upcoming.valid_from = now + Duration::days(5);
        upcoming.valid_until = now + Duration::days(10);
        db.promotions().insert(&upcoming).await.unwrap();

        let mut off = new_promotion("OFF5", Discount::FixedAmount { cents: 500 });
        off.active = false;
        db.promotions().insert(&off).await.unwrap();

        let active = db
            .promotions()
            .list(
                &PromotionFilter {
                    status: Some(PromotionPhase::Active),
                    search: None,
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].code, "LIVE10");

        let upcoming = db
            .promotions()
            .list(
                &PromotionFilter {
                    status: Some(PromotionPhase::Upcoming),
                    search: None,
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(upcoming.len(), 1);

        let searched = db
            .promotions()
            .list(
                &PromotionFilter {
                    status: None,
                    search: Some("off".to_string()),
                },
                now,
            )
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].code, "OFF5");
    }

    #[tokio::test]
    async fn test_update_keeps_usage_and_delete() {
        let db = seeded_db().await;
        let created = db
            .promotions()
            .insert(&new_promotion("FLASH20", Discount::Percentage { bps: 2_000 }))
            .await
            .unwrap();

        let mut edit = new_promotion("FLASH25", Discount::Percentage { bps: 2_500 });
        edit.product_ids = vec!["galaxy-s23".to_string()];
        let updated = db.promotions().update(&created.id, &edit).await.unwrap();

        assert_eq!(updated.code, "FLASH25");
        assert_eq!(updated.product_ids, vec!["galaxy-s23".to_string()]);
        assert_eq!(updated.usage_count, created.usage_count);

        db.promotions().delete(&created.id).await.unwrap();
        assert!(matches!(
            db.promotions().get(&created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
