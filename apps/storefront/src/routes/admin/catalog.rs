//! Product and category management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use electroshop_core::filters::ProductFilter;
use electroshop_core::validation::{validate_new_category, validate_new_product};
use electroshop_core::{Category, NewCategory, NewProduct, Product};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db().products().list(&filter).await?))
}

#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_new_product(&input)?;
    let product = state.db().products().insert(&input).await?;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    validate_new_product(&input)?;
    Ok(Json(state.db().products().update(&id, &input).await?))
}

/// Deletes a product and its reviews. Past orders keep their line
/// snapshots.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db().products().delete(&id).await?;
    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db().categories().list().await?))
}

#[instrument(skip(state, input), fields(id = %input.id))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    validate_new_category(&input)?;
    let category = state.db().categories().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
