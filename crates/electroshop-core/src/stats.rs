//! Aggregate shapes for the admin dashboard.
//!
//! The repositories compute each block with a single aggregate query;
//! [`DashboardStats`] simply bundles them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductStats {
    pub total: i64,
    pub out_of_stock: i64,
    /// Sum of current prices across the catalog, in cents.
    pub catalog_value_cents: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderStats {
    pub total_orders: i64,
    /// Sum of order totals excluding cancelled orders, in cents.
    pub total_sales_cents: i64,
    pub pending_orders: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReviewStats {
    pub total: i64,
    pub pending: i64,
    /// Mean rating of approved reviews, 0.0 when there are none.
    pub average_rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    /// Accounts created in the last 30 days.
    pub new_last_30_days: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub products: ProductStats,
    pub orders: OrderStats,
    pub reviews: ReviewStats,
    pub users: UserStats,
}

/// Rounds an average rating to one decimal place for display.
pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.26), 4.3);
        assert_eq!(round_rating(0.0), 0.0);
    }

    #[test]
    fn test_dashboard_wire_format() {
        let json = serde_json::to_value(DashboardStats::default()).unwrap();
        assert_eq!(json["orders"]["totalSalesCents"], 0);
        assert_eq!(json["users"]["newLast30Days"], 0);
    }
}
