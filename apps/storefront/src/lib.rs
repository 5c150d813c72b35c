//! # ElectroShop Storefront
//!
//! JSON API for the ElectroShop storefront and its admin panel.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront Services                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Catalog       │  │  Cart          │  │  Checkout                  ││
//! │  │                │  │                │  │                            ││
//! │  │ • Products     │  │ • Cookie       │  │ • Promotion preview        ││
//! │  │ • Categories   │  │   snapshot     │  │ • Payment intent           ││
//! │  │ • Reviews      │  │ • Add / update │  │ • Order + promo redemption ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  Admin         │  │  Health        │                                │
//! │  │                │  │                │                                │
//! │  │ • Dashboard    │  │ • Liveness     │                                │
//! │  │ • CRUD         │  │ • Readiness    │                                │
//! │  │ • Order status │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────┐│  │
//! │  │  │  SQLite      │  │  Payment gateway │  │  tracing             ││  │
//! │  │  │ (sqlx pool)  │  │  (reqwest)       │  │  (TraceLayer)        ││  │
//! │  │  └──────────────┘  └──────────────────┘  └──────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! See [`config`] for the environment variables.

pub mod cart_cookie;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::StorefrontConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
