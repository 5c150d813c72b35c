//! # Listing Filters
//!
//! Query parameters accepted by the catalog and admin listings. They
//! deserialize straight from the URL query string and are handed to the
//! repositories unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::promotion::PromotionPhase;
use crate::types::{OrderStatus, ReviewStatus, UserRole};

/// Hard ceiling on `limit` for any listing.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    /// Highest rated first.
    Rating,
    /// Most recently added first.
    Newest,
}

/// Catalog listing filter (`GET /api/products`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductFilter {
    /// Category slug.
    #[serde(default)]
    pub category: Option<String>,
    /// Case-insensitive match on name and description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<ProductSort>,
    /// Only discounted or highly rated products.
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Admin order listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderFilter {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Matches order number, customer name or email.
    #[serde(default)]
    pub search: Option<String>,
    /// Inclusive lower bound on `created_at`.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
}

/// Admin review listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewFilter {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    /// Matches comment or author name.
    #[serde(default)]
    pub search: Option<String>,
}

/// Admin user listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserFilter {
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Matches name or email.
    #[serde(default)]
    pub search: Option<String>,
}

/// Admin promotion listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromotionFilter {
    /// Lifecycle phase evaluated at request time.
    #[serde(default)]
    pub status: Option<PromotionPhase>,
    /// Matches code or description.
    #[serde(default)]
    pub search: Option<String>,
}

/// Normalizes a free-text search term: trimmed, empty means no filter.
pub fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
}

/// Clamps a requested page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}
