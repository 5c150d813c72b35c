//! Account management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use electroshop_core::filters::UserFilter;
use electroshop_core::validation::validate_new_user;
use electroshop_core::{NewUser, User};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db().users().list(&filter).await?))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<User>> {
    Ok(Json(state.db().users().get(&id).await?))
}

#[instrument(skip(state, input), fields(role = ?input.role))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_new_user(&input)?;
    let user = state.db().users().insert(&input).await?;
    info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewUser>,
) -> ApiResult<Json<User>> {
    validate_new_user(&input)?;
    Ok(Json(state.db().users().update(&id, &input).await?))
}

/// Deletes the account and its reviews; its orders remain as guest orders.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.db().users().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
