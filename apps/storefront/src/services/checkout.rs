//! Checkout orchestration.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart (cookie) ──► empty? ──────────────────────────► VALIDATION_ERROR  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  customer form ──► validate ────────────────────────► VALIDATION_ERROR  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  re-price lines from catalog ──► missing / out of stock                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  promo code? ──► validate against priced cart ──────► VALIDATION_ERROR  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  totals = subtotal − discount + shipping                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  payment intent (Idempotency-Key = order number) ───► PAYMENT_ERROR     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  BEGIN; insert order + items; consume promotion; COMMIT ──► CONFLICT    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use electroshop_core::order::{build_order, price_cart, subtotal, CustomerDetails, OrderTotals, PricedLine};
use electroshop_core::promotion::{self, CartContext};
use electroshop_core::validation::validate_customer_details;
use electroshop_core::{Cart, CoreError, Money, Order, Promotion};
use electroshop_db::{OrderStore, ProductStore, PromotionStore};

use crate::error::{ApiError, ApiResult};
use crate::services::payment::{PaymentGateway, PaymentIntentRequest};

/// Checkout form submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    #[serde(default)]
    pub promo_code: Option<String>,
    /// Signed-in customer placing the order.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A placed order plus the secret the browser confirms payment with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order: Order,
    pub client_secret: String,
}

/// Pricing settings applied at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub shipping_fee: Money,
}

/// Places orders from carts.
pub struct CheckoutService<'a, P, R, O> {
    products: &'a P,
    promotions: &'a R,
    orders: &'a O,
    gateway: &'a dyn PaymentGateway,
    settings: CheckoutSettings,
}

impl<'a, P, R, O> CheckoutService<'a, P, R, O>
where
    P: ProductStore,
    R: PromotionStore,
    O: OrderStore,
{
    pub fn new(
        products: &'a P,
        promotions: &'a R,
        orders: &'a O,
        gateway: &'a dyn PaymentGateway,
        settings: CheckoutSettings,
    ) -> Self {
        CheckoutService {
            products,
            promotions,
            orders,
            gateway,
            settings,
        }
    }

    /// Runs the checkout for `cart`. The caller clears the cart on success.
    pub async fn checkout(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
    ) -> ApiResult<CheckoutReceipt> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_customer_details(&request.customer)?;

        let catalog = self.products.find_products(&cart.product_ids()).await?;
        let lines = price_cart(cart, &catalog)?;
        let subtotal = subtotal(&lines);

        let promotion = match request.promo_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Some(self.redeemable_promotion(code, &lines, subtotal, now).await?),
            _ => None,
        };

        let discount = promotion
            .as_ref()
            .map(|p| promotion::discount_amount(&p.discount, subtotal))
            .unwrap_or_else(Money::zero);
        let totals = OrderTotals::compute(subtotal, discount, self.settings.shipping_fee);

        let mut order = build_order(
            &request.customer,
            request.user_id.clone(),
            &lines,
            totals,
            promotion.as_ref().map(|p| p.code.clone()),
            now,
        );

        let intent = self
            .gateway
            .create_payment_intent(&self.intent_request(&order))
            .await?;
        order.payment_intent_id = Some(intent.id);

        if let Err(err) = self
            .orders
            .place_order(&order, promotion.as_ref().map(|p| p.id.as_str()))
            .await
        {
            warn!(
                order_number = %order.order_number,
                error = %err,
                "Order not persisted after payment intent creation"
            );
            return Err(err.into());
        }

        info!(
            order_number = %order.order_number,
            total_cents = order.total_cents,
            items = order.items.len(),
            promotion = ?order.promotion_code,
            "Order placed"
        );

        Ok(CheckoutReceipt {
            order,
            client_secret: intent.client_secret,
        })
    }

    /// Looks the code up and validates it against the priced cart.
    async fn redeemable_promotion(
        &self,
        code: &str,
        lines: &[PricedLine],
        subtotal: Money,
        now: DateTime<Utc>,
    ) -> ApiResult<Promotion> {
        let found = self.promotions.find_by_code(code).await?;

        let product_ids: Vec<String> = lines.iter().map(|l| l.product_id.clone()).collect();
        let mut category_ids: Vec<String> = Vec::new();
        for line in lines {
            if !category_ids.contains(&line.category_id) {
                category_ids.push(line.category_id.clone());
            }
        }

        let outcome = promotion::validate(
            code,
            found.as_ref(),
            now,
            CartContext {
                total: subtotal,
                product_ids: &product_ids,
                category_ids: &category_ids,
            },
        );

        match (outcome.valid, found) {
            (true, Some(promotion)) => Ok(promotion),
            _ => Err(ApiError::Validation(
                outcome
                    .message
                    .unwrap_or_else(|| "Invalid promotion code".to_string()),
            )),
        }
    }

    fn intent_request(&self, order: &Order) -> PaymentIntentRequest {
        let mut metadata = BTreeMap::new();
        metadata.insert("order_number".to_string(), order.order_number.clone());
        metadata.insert("customer_name".to_string(), order.customer_name.clone());
        metadata.insert("address".to_string(), order.shipping_address.to_string());

        PaymentIntentRequest {
            amount_cents: order.total_cents,
            currency: self.settings.currency.clone(),
            receipt_email: order.customer_email.clone(),
            metadata,
            idempotency_key: Some(order.order_number.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;

    use electroshop_core::{Discount, Product};
    use electroshop_db::{DbError, DbResult};

    use crate::services::payment::{PaymentError, PaymentIntent};

    struct Catalog(Vec<Product>);

    #[async_trait]
    impl ProductStore for Catalog {
        async fn find_product(&self, id: &str) -> DbResult<Option<Product>> {
            Ok(self.0.iter().find(|p| p.id == id).cloned())
        }

        async fn find_products(&self, ids: &[String]) -> DbResult<Vec<Product>> {
            Ok(self.0.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
        }
    }

    struct Promotions(Vec<Promotion>);

    #[async_trait]
    impl PromotionStore for Promotions {
        async fn find_by_code(&self, code: &str) -> DbResult<Option<Promotion>> {
            let code = promotion::normalize_code(code);
            Ok(self.0.iter().find(|p| p.code == code).cloned())
        }
    }

    #[derive(Default)]
    struct Orders {
        placed: Mutex<Vec<(Order, Option<String>)>>,
        exhausted: bool,
    }

    #[async_trait]
    impl OrderStore for Orders {
        async fn place_order(&self, order: &Order, promotion_id: Option<&str>) -> DbResult<()> {
            if self.exhausted && promotion_id.is_some() {
                return Err(DbError::Conflict("promotion usage limit reached".to_string()));
            }
            self.placed
                .lock()
                .unwrap()
                .push((order.clone(), promotion_id.map(str::to_string)));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Gateway {
        requests: Mutex<Vec<PaymentIntentRequest>>,
    }

    #[async_trait]
    impl PaymentGateway for Gateway {
        async fn create_payment_intent(
            &self,
            request: &PaymentIntentRequest,
        ) -> Result<PaymentIntent, PaymentError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(PaymentIntent {
                id: "pi_123".to_string(),
                client_secret: "pi_123_secret".to_string(),
            })
        }
    }

    fn product(id: &str, price_cents: i64, category_id: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            full_description: None,
            price_cents,
            old_price_cents: None,
            discount_percent: 0,
            image: String::new(),
            category_id: category_id.to_string(),
            in_stock: true,
            rating: 0.0,
            review_count: 0,
            specifications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn welcome10() -> Promotion {
        let now = Utc::now();
        Promotion {
            id: "promo-1".to_string(),
            code: "WELCOME10".to_string(),
            description: None,
            discount: Discount::Percentage { bps: 1_000 },
            minimum_purchase_cents: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(30),
            usage_limit: 0,
            usage_count: 0,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(promo_code: Option<&str>) -> CheckoutRequest {
        CheckoutRequest {
            customer: CustomerDetails {
                name: "Jean Dupont".to_string(),
                email: "Jean@Example.com".to_string(),
                address: "12 rue de la Paix".to_string(),
                city: "Paris".to_string(),
                postal_code: "75002".to_string(),
                country: "France".to_string(),
            },
            promo_code: promo_code.map(str::to_string),
            user_id: None,
        }
    }

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            currency: "eur".to_string(),
            shipping_fee: Money::from_cents(599),
        }
    }

    #[tokio::test]
    async fn test_checkout_reprices_and_applies_promotion() {
        let stale = product("1", 5_000, "audio");
        let mut cart = Cart::new();
        cart.add(&stale, 2).unwrap();

        // Price changed since the item was added.
        let catalog = Catalog(vec![product("1", 6_000, "audio")]);
        let promotions = Promotions(vec![welcome10()]);
        let orders = Orders::default();
        let gateway = Gateway::default();
        let service = CheckoutService::new(&catalog, &promotions, &orders, &gateway, settings());

        let receipt = service
            .checkout(&cart, &request(Some("welcome10")), Utc::now())
            .await
            .unwrap();

        let order = &receipt.order;
        assert_eq!(order.subtotal_cents, 12_000);
        assert_eq!(order.discount_cents, 1_200);
        assert_eq!(order.shipping_cents, 599);
        assert_eq!(order.total_cents, 11_399);
        assert_eq!(order.items[0].unit_price_cents, 6_000);
        assert_eq!(order.promotion_code.as_deref(), Some("WELCOME10"));
        assert_eq!(order.payment_intent_id.as_deref(), Some("pi_123"));
        assert_eq!(receipt.client_secret, "pi_123_secret");

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].amount_cents, 11_399);
        assert_eq!(requests[0].receipt_email, "jean@example.com");
        assert_eq!(requests[0].idempotency_key.as_ref(), Some(&order.order_number));

        let placed = orders.placed.lock().unwrap();
        assert_eq!(placed[0].1.as_deref(), Some("promo-1"));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let catalog = Catalog(Vec::new());
        let promotions = Promotions(Vec::new());
        let orders = Orders::default();
        let gateway = Gateway::default();
        let service = CheckoutService::new(&catalog, &promotions, &orders, &gateway, settings());

        let err = service
            .checkout(&Cart::new(), &request(None), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_code_is_validation_error() {
        let mut cart = Cart::new();
        cart.add(&product("1", 5_000, "audio"), 1).unwrap();

        let catalog = Catalog(vec![product("1", 5_000, "audio")]);
        let promotions = Promotions(Vec::new());
        let orders = Orders::default();
        let gateway = Gateway::default();
        let service = CheckoutService::new(&catalog, &promotions, &orders, &gateway, settings());

        let err = service
            .checkout(&cart, &request(Some("NOPE")), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid promotion code");
        assert!(orders.placed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock_product_blocks_checkout() {
        let mut cart = Cart::new();
        cart.add(&product("1", 5_000, "audio"), 1).unwrap();

        let mut sold_out = product("1", 5_000, "audio");
        sold_out.in_stock = false;
        let catalog = Catalog(vec![sold_out]);
        let promotions = Promotions(Vec::new());
        let orders = Orders::default();
        let gateway = Gateway::default();
        let service = CheckoutService::new(&catalog, &promotions, &orders, &gateway, settings());

        let err = service
            .checkout(&cart, &request(None), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_exhausted_promotion_at_commit_is_conflict() {
        let mut cart = Cart::new();
        cart.add(&product("1", 5_000, "audio"), 1).unwrap();

        let catalog = Catalog(vec![product("1", 5_000, "audio")]);
        let promotions = Promotions(vec![welcome10()]);
        let orders = Orders {
            exhausted: true,
            ..Orders::default()
        };
        let gateway = Gateway::default();
        let service = CheckoutService::new(&catalog, &promotions, &orders, &gateway, settings());

        let err = service
            .checkout(&cart, &request(Some("WELCOME10")), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }
}
