//! # User Repository
//!
//! Customer and administrator accounts. Emails are stored lowercase and
//! are unique.

use chrono::{DateTime, Duration, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use electroshop_core::filters::{search_term, UserFilter};
use electroshop_core::stats::UserStats;
use electroshop_core::{NewUser, User, UserRole};

use super::like_pattern;
use crate::error::{DbError, DbResult};

const USER_COLUMNS: &str = "id, name, email, image, role, created_at";

/// Window for the "new users" dashboard counter.
const NEW_USER_WINDOW_DAYS: i64 = 30;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    image: Option<String>,
    role: UserRole,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            image: row.image,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn duplicate_email(err: sqlx::Error, email: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
        other => other,
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists users, newest first.
    pub async fn list(&self, filter: &UserFilter) -> DbResult<Vec<User>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE 1 = 1", USER_COLUMNS));

        if let Some(role) = filter.role {
            qb.push(" AND role = ").push_bind(role);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR email LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC");

        let rows = qb.build_query_as::<UserRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn get(&self, id: &str) -> DbResult<User> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Looks a user up by email, ignoring case.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    /// Creates a user. Duplicate emails fail with a unique violation.
    pub async fn insert(&self, input: &NewUser) -> DbResult<User> {
        let id = Uuid::new_v4().to_string();
        let email = normalize_email(&input.email);

        debug!(id = %id, role = ?input.role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, image, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(input.name.trim())
        .bind(&email)
        .bind(&input.image)
        .bind(input.role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        self.get(&id).await
    }

    /// Replaces a user's profile and role.
    pub async fn update(&self, id: &str, input: &NewUser) -> DbResult<User> {
        let email = normalize_email(&input.email);

        debug!(id = %id, "Updating user");

        let result = sqlx::query(
            "UPDATE users SET name = ?2, email = ?3, image = ?4, role = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&email)
        .bind(&input.image)
        .bind(input.role)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_email(e, &email))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get(id).await
    }

    /// Deletes a user. Their reviews go with them; their orders are kept
    /// as guest orders.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// User aggregates for the dashboard.
    pub async fn stats(&self) -> DbResult<UserStats> {
        let since = Utc::now() - Duration::days(NEW_USER_WINDOW_DAYS);

        let (total, admins, new_last_30_days): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN role = 'admin' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN created_at >= ?1 THEN 1 ELSE 0 END), 0)
            FROM users
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserStats {
            total,
            admins,
            new_last_30_days,
        })
    }
}
