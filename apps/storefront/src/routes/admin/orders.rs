//! Order review and lifecycle management.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use electroshop_core::filters::OrderFilter;
use electroshop_core::order::allowed_next_statuses;
use electroshop_core::{Order, OrderStatus, PaymentStatus};

use crate::error::ApiResult;
use crate::services::orders;
use crate::state::AppState;

/// An order plus the statuses the admin UI may offer next.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub allowed_next_statuses: Vec<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub payment_status: PaymentStatus,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db().orders().list(&filter).await?))
}

pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.db().orders().recent(query.limit).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderDetail>> {
    let order = state.db().orders().get(&id).await?;
    Ok(Json(OrderDetail {
        allowed_next_statuses: allowed_next_statuses(order.status),
        order,
    }))
}

#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<Order>> {
    let order = orders::update_status(&state.db().orders(), &id, update.status).await?;
    Ok(Json(order))
}

#[instrument(skip(state))]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PaymentStatusUpdate>,
) -> ApiResult<Json<Order>> {
    let order =
        orders::update_payment_status(&state.db().orders(), &id, update.payment_status).await?;
    Ok(Json(order))
}
