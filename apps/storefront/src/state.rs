//! Application state shared across handlers.

use std::sync::Arc;

use electroshop_core::Money;
use electroshop_db::Database;

use crate::config::StorefrontConfig;
use crate::services::payment::PaymentGateway;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `db` - Database handle
    /// * `gateway` - Payment processor client
    pub fn new(config: StorefrontConfig, db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                gateway,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.inner.gateway.as_ref()
    }

    /// Flat shipping fee as configured.
    #[must_use]
    pub fn shipping_fee(&self) -> Money {
        Money::from_cents(self.inner.config.shipping_cents)
    }
}
