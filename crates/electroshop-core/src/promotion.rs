//! # Promotion Validation
//!
//! Decides whether a coupon code applies to a cart and how much it takes off.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  code ──► normalize_code() ──► lookup (by the caller)                   │
//! │                                      │                                  │
//! │   1. not found ──────────────────────┤──► NotFound                      │
//! │   2. active == false ────────────────┤──► Inactive                      │
//! │   3. now < valid_from ───────────────┤──► NotYetValid                   │
//! │   4. now > valid_until ──────────────┤──► Expired                       │
//! │   5. limit > 0 && count >= limit ────┤──► UsageExhausted                │
//! │   6. cart total < minimum ───────────┤──► BelowMinimum                  │
//! │   7. scoped && no product/category ──┤──► ScopeMismatch                 │
//! │                                      ▼                                  │
//! │   discount = % of total or fixed, capped at the total                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing check wins. Percentage discounts apply to the whole
//! cart total even when the code is scoped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Discount, Promotion};

// =============================================================================
// Outcome
// =============================================================================

/// Why a promotion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PromotionRejection {
    NotFound,
    Inactive,
    NotYetValid,
    Expired,
    UsageExhausted,
    BelowMinimum,
    ScopeMismatch,
}

impl PromotionRejection {
    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            PromotionRejection::NotFound => "Invalid promotion code",
            PromotionRejection::Inactive => "This promotion code is no longer active",
            PromotionRejection::NotYetValid => "This promotion code is not valid yet",
            PromotionRejection::Expired => "This promotion code has expired",
            PromotionRejection::UsageExhausted => {
                "This promotion code has reached its usage limit"
            }
            PromotionRejection::BelowMinimum => {
                "Your cart total does not reach the minimum purchase for this code"
            }
            PromotionRejection::ScopeMismatch => {
                "This promotion code does not apply to the products in your cart"
            }
        }
    }
}

/// Result of validating a code against a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromotionOutcome {
    pub valid: bool,
    /// Amount taken off the cart total (0 when invalid).
    pub discount_cents: i64,
    /// Normalized code that was checked.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PromotionRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PromotionOutcome {
    fn accepted(code: &str, discount: Money) -> Self {
        PromotionOutcome {
            valid: true,
            discount_cents: discount.cents(),
            code: code.to_string(),
            reason: None,
            message: None,
        }
    }

    fn rejected(code: &str, reason: PromotionRejection) -> Self {
        PromotionOutcome {
            valid: false,
            discount_cents: 0,
            code: code.to_string(),
            reason: Some(reason),
            message: Some(reason.message().to_string()),
        }
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }
}

// =============================================================================
// Cart Context
// =============================================================================

/// What the validator needs to know about the cart.
#[derive(Debug, Clone, Copy)]
pub struct CartContext<'a> {
    pub total: Money,
    pub product_ids: &'a [String],
    pub category_ids: &'a [String],
}

// =============================================================================
// Validation
// =============================================================================

/// Canonical form of a code: trimmed and uppercased.
///
/// Codes are stored in this form and lookups normalize first, so matching
/// is case-insensitive.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validates a looked-up promotion against a cart.
///
/// ## Arguments
/// * `code` - The code as entered (used in the outcome)
/// * `promotion` - Result of looking up the normalized code
/// * `now` - Evaluation instant
/// * `cart` - Cart total plus its product and category ids
///
/// ## Example
/// ```rust,ignore
/// let promo = db.promotions().get_by_code("welcome10").await?;
/// let outcome = validate("welcome10", promo.as_ref(), Utc::now(), cart_ctx);
/// if outcome.valid { total -= outcome.discount(); }
/// ```
pub fn validate(
    code: &str,
    promotion: Option<&Promotion>,
    now: DateTime<Utc>,
    cart: CartContext<'_>,
) -> PromotionOutcome {
    let code = normalize_code(code);

    match check(promotion, now, cart) {
        Ok(discount) => PromotionOutcome::accepted(&code, discount),
        Err(reason) => PromotionOutcome::rejected(&code, reason),
    }
}

fn check(
    promotion: Option<&Promotion>,
    now: DateTime<Utc>,
    cart: CartContext<'_>,
) -> Result<Money, PromotionRejection> {
    let promotion = promotion.ok_or(PromotionRejection::NotFound)?;

    if !promotion.active {
        return Err(PromotionRejection::Inactive);
    }
    if now < promotion.valid_from {
        return Err(PromotionRejection::NotYetValid);
    }
    if now > promotion.valid_until {
        return Err(PromotionRejection::Expired);
    }
    if promotion.is_exhausted() {
        return Err(PromotionRejection::UsageExhausted);
    }
    if cart.total < Money::from_cents(promotion.minimum_purchase_cents) {
        return Err(PromotionRejection::BelowMinimum);
    }
    if promotion.is_scoped() && !matches_scope(promotion, cart) {
        return Err(PromotionRejection::ScopeMismatch);
    }

    Ok(discount_amount(&promotion.discount, cart.total))
}

/// A scoped promotion applies when the cart contains any listed product OR
/// any product of a listed category.
fn matches_scope(promotion: &Promotion, cart: CartContext<'_>) -> bool {
    let product_match = cart
        .product_ids
        .iter()
        .any(|id| promotion.product_ids.contains(id));
    let category_match = cart
        .category_ids
        .iter()
        .any(|id| promotion.category_ids.contains(id));

    product_match || category_match
}

/// Computes the discount for a total, never exceeding the total.
pub fn discount_amount(discount: &Discount, total: Money) -> Money {
    let raw = match discount {
        Discount::Percentage { bps } => total.percentage(*bps),
        Discount::FixedAmount { cents } => Money::from_cents(*cents),
    };
    raw.capped_at(total)
}

// =============================================================================
// Phases
// =============================================================================

/// Where a promotion sits in its lifecycle, for admin listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PromotionPhase {
    /// Switched off by an admin.
    Inactive,
    /// Starts in the future.
    Upcoming,
    /// Validity window has ended.
    Expired,
    /// Redeemable now (usage limits aside).
    Active,
}

impl PromotionPhase {
    pub fn of(promotion: &Promotion, now: DateTime<Utc>) -> Self {
        if !promotion.active {
            PromotionPhase::Inactive
        } else if now < promotion.valid_from {
            PromotionPhase::Upcoming
        } else if now > promotion.valid_until {
            PromotionPhase::Expired
        } else {
            PromotionPhase::Active
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
