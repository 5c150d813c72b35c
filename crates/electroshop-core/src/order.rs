//! # Order Rules
//!
//! Lifecycle transitions and checkout arithmetic for orders.
//!
//! ## Status Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──► processing ──► shipped ──► delivered                     │
//! │      │  └──────────┴──────────┴─► (forward skips allowed)              │
//! │      │             │                                                    │
//! │      └──────┬──────┘                                                    │
//! │             ▼                                                           │
//! │         cancelled            delivered and cancelled are terminal      │
//! │                                                                         │
//! │   Payment:  pending ──► paid ──► refunded                              │
//! │                │         ▲                                              │
//! │                ▼         │                                              │
//! │              failed ─────┘  (failed may also go back to pending)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Setting the current status again is accepted as a no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Order, OrderItem, OrderStatus, PaymentStatus, Product, ShippingAddress};

// =============================================================================
// Status Transitions
// =============================================================================

impl OrderStatus {
    /// Position along the fulfilment path; `None` for cancelled.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an order in this status may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        match (self.stage(), next.stage()) {
            (Some(from), Some(to)) => to > from,
            (Some(_), None) => matches!(self, OrderStatus::Pending | OrderStatus::Processing),
            (None, _) => false,
        }
    }
}

impl PaymentStatus {
    /// Whether a payment in this status may move to `next`.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;

        *self == next
            || matches!(
                (self, next),
                (Pending, Paid) | (Pending, Failed) | (Failed, Pending) | (Failed, Paid) | (Paid, Refunded)
            )
    }
}

/// Checks an order status change.
pub fn check_status_transition(order_id: &str, from: OrderStatus, to: OrderStatus) -> CoreResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidStatusTransition {
            order_id: order_id.to_string(),
            from,
            to,
        })
    }
}

/// Checks a payment status change.
pub fn check_payment_transition(
    order_id: &str,
    from: PaymentStatus,
    to: PaymentStatus,
) -> CoreResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidPaymentTransition {
            order_id: order_id.to_string(),
            from,
            to,
        })
    }
}

/// Statuses an order may move to from `from`, excluding `from` itself.
pub fn allowed_next_statuses(from: OrderStatus) -> Vec<OrderStatus> {
    OrderStatus::ALL
        .into_iter()
        .filter(|s| *s != from && from.can_transition_to(*s))
        .collect()
}

// =============================================================================
// Checkout Totals
// =============================================================================

/// Money breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
}

impl OrderTotals {
    /// total = subtotal − discount + shipping.
    ///
    /// The discount is capped at the subtotal and shipping is only charged
    /// on a non-empty subtotal.
    pub fn compute(subtotal: Money, discount: Money, shipping_fee: Money) -> Self {
        let discount = discount.capped_at(subtotal);
        let shipping = if subtotal.is_positive() {
            shipping_fee
        } else {
            Money::zero()
        };
        let total = subtotal - discount + shipping;

        OrderTotals {
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            shipping_cents: shipping.cents(),
            total_cents: total.cents(),
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// A cart line priced against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub category_id: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Re-prices every cart entry from the catalog.
///
/// ## Errors
/// - `EmptyCart` if there is nothing to price
/// - `ProductNotFound` if a product has been removed from the catalog
/// - `OutOfStock` if a product is no longer in stock
pub fn price_cart(cart: &Cart, catalog: &[Product]) -> CoreResult<Vec<PricedLine>> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    cart.entries()
        .iter()
        .map(|entry| {
            let product = catalog
                .iter()
                .find(|p| p.id == entry.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(entry.product_id.clone()))?;

            if !product.in_stock {
                return Err(CoreError::OutOfStock {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                });
            }

            Ok(PricedLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                category_id: product.category_id.clone(),
                unit_price: product.price(),
                quantity: entry.quantity,
            })
        })
        .collect()
}

/// Σ line totals.
pub fn subtotal(lines: &[PricedLine]) -> Money {
    lines.iter().map(PricedLine::line_total).sum()
}

// =============================================================================
// Order Construction
// =============================================================================

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl CustomerDetails {
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            name: self.name.trim().to_string(),
            street: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }
}

/// Generates a customer-facing order number, e.g. `ORD-250615-3F9A2C`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("ORD-{}-{}", now.format("%y%m%d"), suffix)
}

/// Builds a new `pending`/`pending` order from priced lines.
///
/// Line items snapshot name and unit price so later catalog edits do not
/// rewrite order history.
pub fn build_order(
    customer: &CustomerDetails,
    user_id: Option<String>,
    lines: &[PricedLine],
    totals: OrderTotals,
    promotion_code: Option<String>,
    now: DateTime<Utc>,
) -> Order {
    let id = Uuid::new_v4().to_string();

    let items = lines
        .iter()
        .map(|line| OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: id.clone(),
            product_id: line.product_id.clone(),
            name_snapshot: line.name.clone(),
            unit_price_cents: line.unit_price.cents(),
            quantity: line.quantity,
            line_total_cents: line.line_total().cents(),
        })
        .collect();

    Order {
        id,
        order_number: generate_order_number(now),
        user_id,
        customer_name: customer.name.trim().to_string(),
        customer_email: customer.email.trim().to_lowercase(),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        shipping_address: customer.shipping_address(),
        subtotal_cents: totals.subtotal_cents,
        discount_cents: totals.discount_cents,
        shipping_cents: totals.shipping_cents,
        total_cents: totals.total_cents,
        promotion_code,
        payment_intent_id: None,
        tracking_number: None,
        items,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
