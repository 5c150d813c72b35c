//! Cart route handlers.
//!
//! Every handler rebuilds the cart from the `cart-storage` cookie, applies
//! the change and answers with the full cart plus an updated cookie.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use electroshop_core::cart::CartTotals;
use electroshop_core::{CartEntry, CoreError};

use crate::cart_cookie::{load_cart, CookieCart};
use crate::error::ApiResult;
use crate::state::AppState;

/// Cart as returned to the browser.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartEntry>,
    pub totals: CartTotals,
    /// Set when the stored cart could not be read and was emptied.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cart_reset: bool,
}

impl From<&CookieCart> for CartView {
    fn from(cart: &CookieCart) -> Self {
        CartView {
            items: cart.cart().entries().to_vec(),
            totals: CartTotals::from(cart.cart()),
            cart_reset: cart.was_reset(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

type CartResponse = (CookieJar, Json<CartView>);

/// Renders the cart next to the jar holding any pending cookie write.
fn respond(cart: CookieCart) -> CartResponse {
    let view = CartView::from(&cart);
    (cart.into_storage().into_jar(), Json(view))
}

pub async fn show(State(state): State<AppState>, jar: CookieJar) -> ApiResult<CartResponse> {
    Ok(respond(load_cart(state.db(), jar).await?))
}

#[instrument(skip(state, jar))]
pub async fn add_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<CartResponse> {
    let mut cart = load_cart(state.db(), jar).await?;

    let product = state
        .db()
        .products()
        .find(&request.product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;

    cart.add(&product, request.quantity)?;
    debug!(
        product_id = %product.id,
        quantity = request.quantity,
        items = cart.cart().item_count(),
        "Added to cart"
    );

    Ok(respond(cart))
}

pub async fn update_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateItemRequest>,
) -> ApiResult<CartResponse> {
    let mut cart = load_cart(state.db(), jar).await?;
    cart.update_quantity(&product_id, request.quantity)?;
    Ok(respond(cart))
}

/// Removing a product that is not in the cart is a no-op.
pub async fn remove_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(product_id): Path<String>,
) -> ApiResult<CartResponse> {
    let mut cart = load_cart(state.db(), jar).await?;
    cart.remove(&product_id)?;
    Ok(respond(cart))
}

pub async fn clear(State(state): State<AppState>, jar: CookieJar) -> ApiResult<CartResponse> {
    let mut cart = load_cart(state.db(), jar).await?;
    cart.clear()?;
    Ok(respond(cart))
}
