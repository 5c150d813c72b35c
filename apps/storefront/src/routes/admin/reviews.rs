//! Review moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use electroshop_core::filters::ReviewFilter;
use electroshop_core::{Review, ReviewStatus};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewStatusUpdate {
    pub status: ReviewStatus,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.db().reviews().list(&filter).await?))
}

/// Approves or rejects a review; the product's rating follows.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ReviewStatusUpdate>,
) -> ApiResult<Json<Review>> {
    let review = state.db().reviews().set_status(&id, update.status).await?;
    info!(review_id = %id, product_id = %review.product_id, status = ?review.status, "Review moderated");
    Ok(Json(review))
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db().reviews().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
