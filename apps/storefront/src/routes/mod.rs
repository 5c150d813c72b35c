//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Database readiness
//!
//! # Catalog
//! GET  /api/products                    - Listing (?category&search&sort&featured&limit)
//! GET  /api/products/{id}               - Product detail
//! GET  /api/products/{id}/related       - Same-category suggestions
//! GET  /api/products/{id}/reviews       - Approved reviews
//! POST /api/products/{id}/reviews       - Submit a review (pending moderation)
//! GET  /api/categories                  - Categories with product counts
//! GET  /api/categories/{id}             - Category detail
//!
//! # Cart (cart-storage cookie)
//! GET    /api/cart                      - Current cart
//! POST   /api/cart/items                - Add a product
//! PATCH  /api/cart/items/{productId}    - Set quantity (≤ 0 removes)
//! DELETE /api/cart/items/{productId}    - Remove a product
//! DELETE /api/cart                      - Empty the cart
//!
//! # Checkout
//! POST /api/promotions/apply            - Preview a promotion code
//! POST /api/create-payment-intent       - Standalone payment intent
//! POST /api/checkout                    - Place the order
//!
//! # Customer history
//! GET  /api/users/{id}/orders
//! GET  /api/users/{id}/reviews
//!
//! # Admin (see `admin`)
//! /api/admin/...
//! ```

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod health;
pub mod users;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

/// Health routes, mounted at the root.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready))
}

/// Public storefront API, mounted at `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/products/{id}/related", get(catalog::related_products))
        .route(
            "/products/{id}/reviews",
            get(catalog::product_reviews).post(catalog::create_review),
        )
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{id}", get(catalog::get_category))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add_item))
        .route(
            "/cart/items/{product_id}",
            patch(cart::update_item).delete(cart::remove_item),
        )
        .route("/promotions/apply", post(checkout::apply_promotion))
        .route("/create-payment-intent", post(checkout::create_payment_intent))
        .route("/checkout", post(checkout::checkout))
        .route("/users/{id}/orders", get(users::orders))
        .route("/users/{id}/reviews", get(users::reviews))
        .nest("/admin", admin::routes())
}
