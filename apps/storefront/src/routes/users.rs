//! Customer order and review history.

use axum::{
    extract::{Path, State},
    Json,
};

use electroshop_core::{Order, Review};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Order>>> {
    state.db().users().get(&id).await?;
    Ok(Json(state.db().orders().for_user(&id).await?))
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Review>>> {
    state.db().users().get(&id).await?;
    Ok(Json(state.db().reviews().for_user(&id).await?))
}
