//! Payment processor client.
//!
//! Checkout only needs one processor call: create a payment intent and hand
//! its client secret to the browser, which confirms the payment directly
//! with the processor.
//!
//! # API Reference
//!
//! - Endpoint: `POST {api_base}/v1/payment_intents`
//! - Authentication: `Authorization: Bearer <secret key>`
//! - Body: `application/x-www-form-urlencoded`, nested keys as `metadata[key]`
//! - Retries are safe with the same `Idempotency-Key`

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::PaymentConfig;

/// Errors that can occur when talking to the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Processor answered with an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the processor response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Amount must be a positive number of minor units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
}

/// What to charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in minor units (cents).
    pub amount_cents: i64,
    /// Lowercase ISO 4217 code.
    pub currency: String,
    pub receipt_email: String,
    pub metadata: BTreeMap<String, String>,
    /// Sent as `Idempotency-Key` when present.
    pub idempotency_key: Option<String>,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Creates payment intents. Implemented by [`StripeGateway`]; tests inject
/// fakes.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;
}

/// Stripe-compatible HTTP gateway.
#[derive(Clone)]
pub struct StripeGateway {
    inner: Arc<StripeGatewayInner>,
}

struct StripeGatewayInner {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    /// Create a new gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Parse(format!("Invalid secret key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let endpoint = config
            .api_base
            .join("v1/payment_intents")
            .map_err(|e| PaymentError::Parse(format!("Invalid API base: {e}")))?;

        Ok(Self {
            inner: Arc::new(StripeGatewayInner { client, endpoint }),
        })
    }

    fn form_fields(request: &PaymentIntentRequest) -> Vec<(String, String)> {
        let mut fields = vec![
            ("amount".to_string(), request.amount_cents.to_string()),
            ("currency".to_string(), request.currency.clone()),
            ("receipt_email".to_string(), request.receipt_email.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in &request.metadata {
            fields.push((format!("metadata[{key}]"), value.clone()));
        }
        fields
    }

    async fn parse_error(response: reqwest::Response) -> PaymentError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| "Unknown error".to_string());

        PaymentError::Api { status, message }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        if request.amount_cents <= 0 {
            return Err(PaymentError::InvalidAmount(request.amount_cents));
        }

        debug!(
            amount = request.amount_cents,
            currency = %request.currency,
            "Creating payment intent"
        );

        let mut builder = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .form(&Self::form_fields(request));
        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let err = Self::parse_error(response).await;
            warn!(error = %err, "Payment processor rejected payment intent");
            return Err(err);
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Parse(format!("Failed to parse response: {e}")))
    }
}
