//! Admin panel API, mounted at `/api/admin`.
//!
//! ```text
//! GET                 /dashboard
//! GET|POST            /products
//! PUT|DELETE          /products/{id}
//! GET|POST            /categories
//! GET|POST            /promotions               ?status&search
//! GET|PUT|DELETE      /promotions/{id}
//! GET                 /orders                   ?userId&status&search&from&to
//! GET                 /orders/recent            ?limit
//! GET                 /orders/{id}
//! PUT                 /orders/{id}/status
//! PUT                 /orders/{id}/payment-status
//! GET                 /reviews                  ?productId&userId&status&search
//! PUT                 /reviews/{id}/status
//! DELETE              /reviews/{id}
//! GET|POST            /users                    ?role&search
//! GET|PUT|DELETE      /users/{id}
//! ```
//!
//! These routes carry no authentication of their own; deployments put them
//! behind the operator's access proxy.

pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod promotions;
pub mod reviews;
pub mod users;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            put(catalog::update_product).delete(catalog::delete_product),
        )
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route("/promotions", get(promotions::list).post(promotions::create))
        .route(
            "/promotions/{id}",
            get(promotions::show)
                .put(promotions::update)
                .delete(promotions::remove),
        )
        .route("/orders", get(orders::list))
        .route("/orders/recent", get(orders::recent))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/orders/{id}/payment-status", put(orders::update_payment_status))
        .route("/reviews", get(reviews::list))
        .route("/reviews/{id}", delete(reviews::remove))
        .route("/reviews/{id}/status", put(reviews::update_status))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
}
