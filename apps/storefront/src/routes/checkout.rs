//! Promotion preview, payment intents and checkout.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use electroshop_core::promotion::{self, CartContext, PromotionRejection};
use electroshop_core::validation::{validate_currency, validate_email};
use electroshop_core::{CartStorage, CoreError};

use crate::cart_cookie::{load_cart, open_cart};
use crate::error::ApiResult;
use crate::services::checkout::{CheckoutReceipt, CheckoutRequest, CheckoutService, CheckoutSettings};
use crate::services::payment::PaymentIntentRequest;
use crate::state::AppState;

// =============================================================================
// Promotion Preview
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplyPromotionRequest {
    pub code: String,
}

/// Outcome of checking a code against the current cart. A refused code is
/// a normal answer, not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPromotionResponse {
    pub valid: bool,
    pub code: String,
    /// Discount in cents (0 when refused).
    pub discount_amount: i64,
    /// Cart total after the discount, before shipping.
    pub total_after_discount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PromotionRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[instrument(skip(state, jar, request), fields(code = %request.code))]
pub async fn apply_promotion(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ApplyPromotionRequest>,
) -> ApiResult<Json<ApplyPromotionResponse>> {
    // Categories come from the catalog; the cookie only holds ids.
    let cart = load_cart(state.db(), jar).await?;
    let cart = cart.cart();

    let found = state.db().promotions().get_by_code(&request.code).await?;

    let product_ids = cart.product_ids();
    let category_ids = cart.category_ids();
    let total = cart.total();
    let outcome = promotion::validate(
        &request.code,
        found.as_ref(),
        Utc::now(),
        CartContext {
            total,
            product_ids: &product_ids,
            category_ids: &category_ids,
        },
    );

    debug!(valid = outcome.valid, reason = ?outcome.reason, "Promotion checked");

    Ok(Json(ApplyPromotionResponse {
        valid: outcome.valid,
        discount_amount: outcome.discount_cents,
        total_after_discount: (total - outcome.discount()).cents(),
        code: outcome.code,
        reason: outcome.reason,
        message: outcome.message,
    }))
}

// =============================================================================
// Payment Intent
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in minor units.
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
    pub customer_email: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

#[instrument(skip(state, request), fields(amount = request.amount))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> ApiResult<Json<CreatePaymentIntentResponse>> {
    if request.amount <= 0 {
        return Err(CoreError::InvalidPaymentAmount {
            reason: "amount must be positive".to_string(),
        }
        .into());
    }

    let currency = request
        .currency
        .map(|c| c.trim().to_lowercase())
        .unwrap_or_else(|| state.config().currency.clone());
    validate_currency(&currency)?;
    validate_email(&request.customer_email)?;

    let intent = state
        .gateway()
        .create_payment_intent(&PaymentIntentRequest {
            amount_cents: request.amount,
            currency,
            receipt_email: request.customer_email.trim().to_string(),
            metadata: request.metadata,
            idempotency_key: None,
        })
        .await?;

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

// =============================================================================
// Checkout
// =============================================================================

/// Places the order and empties the cart cookie.
#[instrument(skip(state, jar, request))]
pub async fn checkout(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CheckoutRequest>,
) -> ApiResult<(CookieJar, Json<CheckoutReceipt>)> {
    // Checkout re-prices from the catalog itself.
    let cart = open_cart(jar);

    let db = state.db();
    let products = db.products();
    let promotions = db.promotions();
    let orders = db.orders();
    let service = CheckoutService::new(
        &products,
        &promotions,
        &orders,
        state.gateway(),
        CheckoutSettings {
            currency: state.config().currency.clone(),
            shipping_fee: state.shipping_fee(),
        },
    );

    let receipt = service.checkout(cart.cart(), &request, Utc::now()).await?;

    let mut storage = cart.into_storage();
    storage.clear();

    Ok((storage.into_jar(), Json(receipt)))
}
