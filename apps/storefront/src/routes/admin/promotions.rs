//! Promotion code management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use electroshop_core::filters::PromotionFilter;
use electroshop_core::promotion::PromotionPhase;
use electroshop_core::validation::validate_new_promotion;
use electroshop_core::{NewPromotion, Promotion};

use crate::error::ApiResult;
use crate::state::AppState;

/// A promotion with its lifecycle phase for the admin table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionView {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub phase: PromotionPhase,
}

impl PromotionView {
    fn at(promotion: Promotion, now: DateTime<Utc>) -> Self {
        let phase = PromotionPhase::of(&promotion, now);
        PromotionView { promotion, phase }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PromotionFilter>,
) -> ApiResult<Json<Vec<PromotionView>>> {
    let now = Utc::now();
    let promotions = state.db().promotions().list(&filter, now).await?;
    Ok(Json(
        promotions
            .into_iter()
            .map(|p| PromotionView::at(p, now))
            .collect(),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PromotionView>> {
    let promotion = state.db().promotions().get(&id).await?;
    Ok(Json(PromotionView::at(promotion, Utc::now())))
}

#[instrument(skip(state, input), fields(code = %input.code))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewPromotion>,
) -> ApiResult<(StatusCode, Json<PromotionView>)> {
    validate_new_promotion(&input)?;
    let promotion = state.db().promotions().insert(&input).await?;
    info!(promotion_id = %promotion.id, code = %promotion.code, "Promotion created");
    Ok((StatusCode::CREATED, Json(PromotionView::at(promotion, Utc::now()))))
}

#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewPromotion>,
) -> ApiResult<Json<PromotionView>> {
    validate_new_promotion(&input)?;
    let promotion = state.db().promotions().update(&id, &input).await?;
    Ok(Json(PromotionView::at(promotion, Utc::now())))
}

#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db().promotions().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
