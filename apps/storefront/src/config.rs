//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first (see
//! `main.rs`).
//!
//! # Environment Variables
//!
//! ## Required
//! - `STRIPE_SECRET_KEY` - Secret key for the payment processor
//!
//! ## Optional
//! - `ELECTROSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `ELECTROSHOP_PORT` - Listen port (default: 3000)
//! - `ELECTROSHOP_DATABASE_PATH` - SQLite file (default: ./electroshop.db)
//! - `ELECTROSHOP_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `ELECTROSHOP_PAYMENT_API_BASE` - Processor base URL (default: https://api.stripe.com)
//! - `ELECTROSHOP_PAYMENT_TIMEOUT_SECS` - Processor call timeout (default: 30)
//! - `ELECTROSHOP_CURRENCY` - ISO 4217 code for payment intents (default: eur)
//! - `ELECTROSHOP_SHIPPING_CENTS` - Flat shipping fee (default: 599)

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use electroshop_core::validation::validate_currency;
use electroshop_core::{DEFAULT_CURRENCY, DEFAULT_SHIPPING_CENTS};

const DEFAULT_PAYMENT_API_BASE: &str = "https://api.stripe.com";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Payment processor settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Bearer secret for the processor API. Redacted in `Debug`.
    pub secret_key: SecretString,

    /// Base URL; `/v1/payment_intents` is resolved against it.
    pub api_base: Url,

    /// Per-request timeout for processor calls.
    pub timeout: Duration,
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled database connections
    pub db_max_connections: u32,

    pub payment: PaymentConfig,

    /// Lowercase ISO 4217 currency for payment intents
    pub currency: String,

    /// Flat shipping fee in cents, charged on non-empty orders
    pub shipping_cents: i64,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("STRIPE_SECRET_KEY".to_string()))?;

        let api_base = lookup("ELECTROSHOP_PAYMENT_API_BASE")
            .unwrap_or_else(|| DEFAULT_PAYMENT_API_BASE.to_string());
        let api_base = Url::parse(&api_base).map_err(|e| {
            ConfigError::InvalidValue("ELECTROSHOP_PAYMENT_API_BASE".to_string(), e.to_string())
        })?;

        let currency = lookup("ELECTROSHOP_CURRENCY")
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
            .to_lowercase();
        validate_currency(&currency).map_err(|e| {
            ConfigError::InvalidValue("ELECTROSHOP_CURRENCY".to_string(), e.to_string())
        })?;

        let shipping_cents: i64 = parse_var(&lookup, "ELECTROSHOP_SHIPPING_CENTS", DEFAULT_SHIPPING_CENTS)?;
        if shipping_cents < 0 {
            return Err(ConfigError::InvalidValue(
                "ELECTROSHOP_SHIPPING_CENTS".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let timeout_secs: u64 = parse_var(&lookup, "ELECTROSHOP_PAYMENT_TIMEOUT_SECS", 30)?;

        Ok(StorefrontConfig {
            host: parse_var(&lookup, "ELECTROSHOP_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_var(&lookup, "ELECTROSHOP_PORT", 3000)?,
            database_path: lookup("ELECTROSHOP_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./electroshop.db")),
            db_max_connections: parse_var(&lookup, "ELECTROSHOP_DB_MAX_CONNECTIONS", 5)?,
            payment: PaymentConfig {
                secret_key: SecretString::from(secret_key),
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
            currency,
            shipping_cents,
        })
    }

    /// Socket address to bind the HTTP listener to.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(name.to_string(), e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[("STRIPE_SECRET_KEY", "sk_test_123")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.currency, "eur");
        assert_eq!(config.shipping_cents, 599);
        assert_eq!(config.payment.timeout, Duration::from_secs(30));
        assert_eq!(config.payment.api_base.as_str(), "https://api.stripe.com/");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_secret_key_is_required() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "STRIPE_SECRET_KEY"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("ELECTROSHOP_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "ELECTROSHOP_PORT"));

        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("ELECTROSHOP_CURRENCY", "euro"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "ELECTROSHOP_CURRENCY"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("STRIPE_SECRET_KEY", "sk_live_very_secret"),
            ("ELECTROSHOP_CURRENCY", "USD"),
        ]))
        .unwrap();

        assert_eq!(config.currency, "usd");
        assert!(!format!("{:?}", config).contains("sk_live_very_secret"));
    }
}
