//! Service layer.
//!
//! - [`checkout`] - Cart to order, payment intent and promotion redemption
//! - [`orders`] - Admin order lifecycle updates
//! - [`payment`] - Payment processor client

pub mod checkout;
pub mod orders;
pub mod payment;
