//! Public catalog: products, categories and product reviews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, instrument};

use electroshop_core::filters::ProductFilter;
use electroshop_core::validation::validate_new_review;
use electroshop_core::{Category, NewReview, Product, Review, RELATED_PRODUCTS_LIMIT};

use crate::error::ApiResult;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db().products().list(&filter).await?;
    debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db().products().get(&id).await?))
}

pub async fn related_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.db().products();
    // 404 for unknown products rather than an empty list.
    products.get(&id).await?;
    Ok(Json(products.related(&id, RELATED_PRODUCTS_LIMIT).await?))
}

pub async fn product_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Review>>> {
    state.db().products().get(&id).await?;
    Ok(Json(state.db().reviews().approved_for_product(&id).await?))
}

/// Submits a review. It stays hidden until an admin approves it.
#[instrument(skip(state, input), fields(user_id = %input.user_id))]
pub async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    validate_new_review(&input)?;
    state.db().products().get(&id).await?;

    let review = state.db().reviews().insert(&id, &input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db().categories().list().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.db().categories().get(&id).await?))
}
