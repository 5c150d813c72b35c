//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE (checkout)                                                   │
//! │     └── place() → one transaction:                                     │
//! │         ├── UPDATE promotions SET usage_count + 1 (guarded)            │
//! │         ├── INSERT orders                                              │
//! │         └── INSERT order_items (snapshot name + unit price)            │
//! │                                                                         │
//! │  2. FULFIL (admin)                                                     │
//! │     └── set_status(id, from, to)                                       │
//! │         pending → processing → shipped → delivered                     │
//! │         pending | processing → cancelled                               │
//! │                                                                         │
//! │  3. PAYMENT (admin / processor)                                        │
//! │     └── set_payment_status(id, from, to)                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transition legality is decided in `electroshop_core::order`; this
//! repository only guarantees the row still holds the status the caller
//! checked against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use electroshop_core::filters::{clamp_limit, search_term, OrderFilter};
use electroshop_core::stats::OrderStats;
use electroshop_core::{Order, OrderItem, OrderStatus, PaymentStatus, ShippingAddress};

use super::{like_pattern, OrderStore};
use crate::error::{DbError, DbResult};

const ORDER_COLUMNS: &str = "id, order_number, user_id, customer_name, customer_email, \
     status, payment_status, ship_name, ship_street, ship_city, ship_postal_code, \
     ship_country, subtotal_cents, discount_cents, shipping_cents, total_cents, \
     promotion_code, payment_intent_id, tracking_number, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    user_id: Option<String>,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
    ship_name: String,
    ship_street: String,
    ship_city: String,
    ship_postal_code: String,
    ship_country: String,
    subtotal_cents: i64,
    discount_cents: i64,
    shipping_cents: i64,
    total_cents: i64,
    promotion_code: Option<String>,
    payment_intent_id: Option<String>,
    tracking_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            status: self.status,
            payment_status: self.payment_status,
            shipping_address: ShippingAddress {
                name: self.ship_name,
                street: self.ship_street,
                city: self.ship_city,
                postal_code: self.ship_postal_code,
                country: self.ship_country,
            },
            subtotal_cents: self.subtotal_cents,
            discount_cents: self.discount_cents,
            shipping_cents: self.shipping_cents,
            total_cents: self.total_cents,
            promotion_code: self.promotion_code,
            payment_intent_id: self.payment_intent_id,
            tracking_number: self.tracking_number,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    name_snapshot: String,
    unit_price_cents: i64,
    quantity: i64,
    line_total_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            name_snapshot: row.name_snapshot,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            line_total_cents: row.line_total_cents,
        }
    }
}

/// Default page size for admin order listings.
const DEFAULT_LIMIT: i64 = 100;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists orders matching the filter, newest first.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        debug!(?filter, "Listing orders");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM orders WHERE 1 = 1",
            ORDER_COLUMNS
        ));

        if let Some(user_id) = filter.user_id.as_deref().filter(|u| !u.is_empty()) {
            qb.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (LOWER(order_number) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(customer_name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(customer_email) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(from) = filter.from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND created_at <= ").push_bind(to);
        }

        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(DEFAULT_LIMIT);

        let rows = qb.build_query_as::<OrderRow>().fetch_all(&self.pool).await?;
        self.with_items(rows).await
    }

    /// The `limit` most recent orders.
    pub async fn recent(&self, limit: Option<i64>) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY created_at DESC LIMIT ?1",
            ORDER_COLUMNS
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(clamp_limit(limit, 5))
            .fetch_all(&self.pool)
            .await?;

        self.with_items(rows).await
    }

    /// All orders placed by a user, newest first.
    pub async fn for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        self.with_items(rows).await
    }

    /// Gets an order with its items.
    pub async fn find(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.with_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Gets an order with its items, failing with NotFound when absent.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        self.find(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Loads line items for a batch of orders in one query.
    async fn with_items(&self, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, order_id, product_id, name_snapshot, unit_price_cents, quantity, \
             line_total_cents FROM order_items WHERE order_id IN (",
        );
        let mut separated = qb.separated(", ");
        for row in &rows {
            separated.push_bind(row.id.clone());
        }
        separated.push_unseparated(") ORDER BY rowid");

        let item_rows = qb
            .build_query_as::<OrderItemRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            by_order
                .entry(item.order_id.clone())
                .or_default()
                .push(OrderItem::from(item));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Persists a new order, consuming one promotion use when given.
    ///
    /// ## Transaction
    /// ```text
    /// BEGIN
    ///   UPDATE promotions SET usage_count = usage_count + 1
    ///     WHERE id = ? AND active = 1
    ///       AND (usage_limit = 0 OR usage_count < usage_limit)
    ///   ── 0 rows? → ROLLBACK, DbError::Conflict
    ///   INSERT orders
    ///   INSERT order_items × n
    /// COMMIT
    /// ```
    pub async fn place(&self, order: &Order, promotion_id: Option<&str>) -> DbResult<()> {
        debug!(
            order_number = %order.order_number,
            items = order.items.len(),
            promotion = ?promotion_id,
            "Placing order"
        );

        let mut tx = self.pool.begin().await?;

        if let Some(promotion_id) = promotion_id {
            let consumed = sqlx::query(
                r#"
                UPDATE promotions SET
                    usage_count = usage_count + 1,
                    updated_at = ?2
                WHERE id = ?1
                  AND active = 1
                  AND (usage_limit = 0 OR usage_count < usage_limit)
                "#,
            )
            .bind(promotion_id)
            .bind(order.created_at)
            .execute(&mut *tx)
            .await?;

            if consumed.rows_affected() == 0 {
                return Err(DbError::Conflict(format!(
                    "promotion {} is no longer redeemable",
                    order.promotion_code.as_deref().unwrap_or(promotion_id)
                )));
            }
        }

        let address = &order.shipping_address;
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, customer_name, customer_email,
                status, payment_status,
                ship_name, ship_street, ship_city, ship_postal_code, ship_country,
                subtotal_cents, discount_cents, shipping_cents, total_cents,
                promotion_code, payment_intent_id, tracking_number,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7,
                ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16,
                ?17, ?18, ?19,
                ?20, ?21
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.user_id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(&address.name)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.postal_code)
        .bind(&address.country)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.shipping_cents)
        .bind(order.total_cents)
        .bind(&order.promotion_code)
        .bind(&order.payment_intent_id)
        .bind(&order.tracking_number)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, product_id, name_snapshot,
                    unit_price_cents, quantity, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&order.id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            order_number = %order.order_number,
            total_cents = order.total_cents,
            "Order placed"
        );

        Ok(())
    }

    /// Moves an order from `from` to `to`.
    ///
    /// Fails with Conflict when the order no longer holds `from`.
    pub async fn set_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> DbResult<Order> {
        debug!(id = %id, %from, %to, "Updating order status");

        let result = sqlx::query(
            "UPDATE orders SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(id).await);
        }

        self.get(id).await
    }

    /// Moves an order's payment status from `from` to `to`.
    pub async fn set_payment_status(
        &self,
        id: &str,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> DbResult<Order> {
        debug!(id = %id, %from, %to, "Updating payment status");

        let result = sqlx::query(
            "UPDATE orders SET payment_status = ?3, updated_at = ?4 \
             WHERE id = ?1 AND payment_status = ?2",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(id).await);
        }

        self.get(id).await
    }

    async fn missing_or_conflict(&self, id: &str) -> DbError {
        match self.find(id).await {
            Ok(Some(_)) => DbError::Conflict(format!("order {} was modified concurrently", id)),
            Ok(None) => DbError::not_found("Order", id),
            Err(e) => e,
        }
    }

    /// Order aggregates for the dashboard. Cancelled orders don't count
    /// towards sales.
    pub async fn stats(&self) -> DbResult<OrderStats> {
        let (total_orders, total_sales_cents, pending_orders): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN status != 'cancelled' THEN total_cents ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0)
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(OrderStats {
            total_orders,
            total_sales_cents,
            pending_orders,
        })
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn place_order(&self, order: &Order, promotion_id: Option<&str>) -> DbResult<()> {
        self.place(order, promotion_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
