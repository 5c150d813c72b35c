//! Order lifecycle updates from the admin panel.
//!
//! The legality of a change is decided by `electroshop_core::order`; the
//! repository write is guarded on the status that was checked, so a
//! concurrent update surfaces as a conflict instead of being overwritten.

use tracing::info;

use electroshop_core::order::{check_payment_transition, check_status_transition};
use electroshop_core::{Order, OrderStatus, PaymentStatus};
use electroshop_db::OrderRepository;

use crate::error::ApiResult;

/// Moves an order to `to`. Setting the current status again is a no-op.
pub async fn update_status(orders: &OrderRepository, id: &str, to: OrderStatus) -> ApiResult<Order> {
    let order = orders.get(id).await?;
    if order.status == to {
        return Ok(order);
    }

    check_status_transition(&order.order_number, order.status, to)?;
    let updated = orders.set_status(id, order.status, to).await?;

    info!(
        order_number = %updated.order_number,
        from = %order.status,
        to = %to,
        "Order status updated"
    );
    Ok(updated)
}

/// Moves an order's payment to `to`. Setting the current status again is a
/// no-op.
pub async fn update_payment_status(
    orders: &OrderRepository,
    id: &str,
    to: PaymentStatus,
) -> ApiResult<Order> {
    let order = orders.get(id).await?;
    if order.payment_status == to {
        return Ok(order);
    }

    check_payment_transition(&order.order_number, order.payment_status, to)?;
    let updated = orders
        .set_payment_status(id, order.payment_status, to)
        .await?;

    info!(
        order_number = %updated.order_number,
        from = %order.payment_status,
        to = %to,
        "Payment status updated"
    );
    Ok(updated)
}
