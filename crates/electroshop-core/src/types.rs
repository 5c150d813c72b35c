//! # Domain Types
//!
//! Core domain types used throughout ElectroShop.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    Product      │◄──│     Review      │       │
//! │  │  id (slug)      │   │  id             │   │  rating 1..=5   │       │
//! │  │  product_count  │   │  price_cents    │   │  status         │       │
//! │  └─────────────────┘   │  in_stock       │   └─────────────────┘       │
//! │                        └────────▲────────┘                              │
//! │                                 │ snapshot                              │
//! │  ┌─────────────────┐   ┌────────┴────────┐   ┌─────────────────┐       │
//! │  │      User       │◄──│     Order       │──►│   Promotion     │       │
//! │  │  role           │   │  status         │   │  code (unique)  │       │
//! │  └─────────────────┘   │  payment_status │   │  discount       │       │
//! │                        │  items[]        │   │  usage counters │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All monetary fields are integer cents (`*_cents`). Wire format is
//! camelCase JSON.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A single technical specification line shown on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Short description for listings.
    pub description: String,

    /// Long-form description for the product page.
    pub full_description: Option<String>,

    /// Current selling price in cents.
    pub price_cents: i64,

    /// Previous price, shown struck through when on sale.
    pub old_price_cents: Option<i64>,

    /// Advertised discount percentage (0 when not on sale).
    pub discount_percent: i64,

    pub image: String,

    pub category_id: String,

    pub in_stock: bool,

    /// Average rating of approved reviews (0.0 when none).
    pub rating: f64,

    /// Number of approved reviews.
    pub review_count: i64,

    pub specifications: Vec<Specification>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Rating at or above which a product is featured even without a discount.
pub const FEATURED_RATING: f64 = 4.5;

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// A product is featured when it is on sale or highly rated.
    pub fn is_featured(&self) -> bool {
        self.discount_percent > 0 || self.rating >= FEATURED_RATING
    }
}

/// A product category. `product_count` is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    /// URL slug, e.g. `smartphones`.
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub product_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Reviews
// =============================================================================

/// Moderation status of a review. Only approved reviews are public.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        ReviewStatus::Pending
    }
}

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    /// Author name at time of writing (frozen).
    pub user_name: String,
    /// 1..=5 stars.
    pub rating: i64,
    pub comment: String,
    pub status: ReviewStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// A registered customer or administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
///
/// See [`crate::order`] for the allowed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting preparation.
    Pending,
    /// Being prepared for shipment.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipment.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of an order, independent of fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment intent created, not yet confirmed.
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {}, {}",
            self.street, self.postal_code, self.city, self.country
        )
    }
}

/// A line item in an order.
/// Uses snapshot pattern to freeze product data at time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Product name at time of purchase (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of purchase (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl OrderItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Human-readable number shown to customers, e.g. `ORD-240518-3F9A2C`.
    pub order_number: String,
    /// Registered customer, if the order was placed while signed in.
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: ShippingAddress,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    /// Promotion code redeemed on this order.
    pub promotion_code: Option<String>,
    /// Processor-side payment intent reference.
    pub payment_intent_id: Option<String>,
    pub tracking_number: Option<String>,
    pub items: Vec<OrderItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Promotions
// =============================================================================

/// Storage discriminator for [`Discount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    FixedAmount,
}

/// What a promotion takes off the cart total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Discount {
    /// Percentage of the cart total in basis points (1500 = 15%).
    Percentage { bps: u32 },
    /// Fixed amount in cents.
    FixedAmount { cents: i64 },
}

impl Discount {
    pub fn kind(&self) -> DiscountKind {
        match self {
            Discount::Percentage { .. } => DiscountKind::Percentage,
            Discount::FixedAmount { .. } => DiscountKind::FixedAmount,
        }
    }

    /// The raw stored value: basis points or cents depending on kind.
    pub fn value(&self) -> i64 {
        match self {
            Discount::Percentage { bps } => i64::from(*bps),
            Discount::FixedAmount { cents } => *cents,
        }
    }

    /// Rebuilds a discount from its stored columns.
    ///
    /// Returns `None` for a percentage that does not fit in basis points.
    pub fn from_parts(kind: DiscountKind, value: i64) -> Option<Self> {
        match kind {
            DiscountKind::Percentage => u32::try_from(value)
                .ok()
                .map(|bps| Discount::Percentage { bps }),
            DiscountKind::FixedAmount => Some(Discount::FixedAmount { cents: value }),
        }
    }
}

/// A coupon code with its redemption rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Promotion {
    pub id: String,
    /// Stored uppercase; matched case-insensitively.
    pub code: String,
    pub description: Option<String>,
    pub discount: Discount,
    /// Cart total required before the code applies.
    pub minimum_purchase_cents: i64,
    #[ts(as = "String")]
    pub valid_from: DateTime<Utc>,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    /// Maximum redemptions; 0 means unlimited.
    pub usage_limit: i64,
    pub usage_count: i64,
    /// Restricts the code to these products (empty = no restriction).
    pub product_ids: Vec<String>,
    /// Restricts the code to these categories (empty = no restriction).
    pub category_ids: Vec<String>,
    pub active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Promotion {
    /// True when the code restricts which products it applies to.
    pub fn is_scoped(&self) -> bool {
        !self.product_ids.is_empty() || !self.category_ids.is_empty()
    }

    /// True when a usage limit is set and has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_limit > 0 && self.usage_count >= self.usage_limit
    }
}

// =============================================================================
// Inputs
// =============================================================================
// Payloads for creating/replacing records. Server-managed fields (ids,
// timestamps, counters, derived ratings) are absent.

/// Product create/replace payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    /// Optional caller-chosen id; a UUID is generated otherwise.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub full_description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub old_price_cents: Option<i64>,
    #[serde(default)]
    pub discount_percent: i64,
    pub image: String,
    pub category_id: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

/// Category create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Promotion create/replace payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPromotion {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount: Discount,
    #[serde(default)]
    pub minimum_purchase_cents: i64,
    #[ts(as = "String")]
    pub valid_from: DateTime<Utc>,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub usage_limit: i64,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Review submission payload. The product comes from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewReview {
    pub user_id: String,
    pub user_name: String,
    pub rating: i64,
    pub comment: String,
}

/// User create/replace payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(discount_percent: i64, rating: f64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Phone".to_string(),
            description: String::new(),
            full_description: None,
            price_cents: 89_999,
            old_price_cents: None,
            discount_percent,
            image: String::new(),
            category_id: "smartphones".to_string(),
            in_stock: true,
            rating,
            review_count: 0,
            specifications: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_featured_when_discounted_or_highly_rated() {
        assert!(product(10, 3.0).is_featured());
        assert!(product(0, 4.5).is_featured());
        assert!(!product(0, 4.4).is_featured());
    }

    #[test]
    fn test_discount_parts() {
        let pct = Discount::Percentage { bps: 1_500 };
        assert_eq!(pct.kind(), DiscountKind::Percentage);
        assert_eq!(Discount::from_parts(pct.kind(), pct.value()), Some(pct));
        assert_eq!(Discount::from_parts(DiscountKind::Percentage, -1), None);
    }

    #[test]
    fn test_discount_wire_format() {
        let json = serde_json::to_value(Discount::FixedAmount { cents: 599 }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "fixed_amount", "cents": 599 }));
    }

    #[test]
    fn test_order_status_display_matches_wire() {
        for status in OrderStatus::ALL {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, serde_json::Value::String(status.to_string()));
        }
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(ReviewStatus::default(), ReviewStatus::Pending);
    }
}
