use axum::{extract::State, Json};

use electroshop_core::stats::DashboardStats;

use crate::error::ApiResult;
use crate::state::AppState;

/// Product, order, review and user aggregates in one call.
pub async fn show(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.db().dashboard_stats().await?))
}
