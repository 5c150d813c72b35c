//! End-to-end API tests: the full router over an in-memory database and a
//! fake payment gateway.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use electroshop_core::{Discount, NewCategory, NewProduct, NewPromotion, OrderStatus, PaymentStatus};
use electroshop_db::{Database, DbConfig};
use electroshop_storefront::config::PaymentConfig;
use electroshop_storefront::services::payment::{
    PaymentError, PaymentGateway, PaymentIntent, PaymentIntentRequest,
};
use electroshop_storefront::{build_router, AppState, StorefrontConfig};

// =============================================================================
// Harness
// =============================================================================

#[derive(Default)]
struct FakeGateway {
    requests: Mutex<Vec<PaymentIntentRequest>>,
    fail: bool,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(PaymentError::Api {
                status: 500,
                message: "processor unavailable".to_string(),
            });
        }
        let n = self.requests.lock().unwrap().len();
        Ok(PaymentIntent {
            id: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret"),
        })
    }
}

struct TestApp {
    router: Router,
    db: Database,
    gateway: Arc<FakeGateway>,
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        database_path: ":memory:".into(),
        db_max_connections: 1,
        payment: PaymentConfig {
            secret_key: "sk_test_fake".to_string().into(),
            api_base: url::Url::parse("http://localhost:12111").unwrap(),
            timeout: Duration::from_secs(5),
        },
        currency: "eur".to_string(),
        shipping_cents: 599,
    }
}

fn product(id: &str, name: &str, price_cents: i64, category_id: &str, in_stock: bool) -> NewProduct {
    NewProduct {
        id: Some(id.to_string()),
        name: name.to_string(),
        description: format!("{name} description"),
        full_description: None,
        price_cents,
        old_price_cents: None,
        discount_percent: 0,
        image: format!("/images/{id}.jpg"),
        category_id: category_id.to_string(),
        in_stock,
        specifications: Vec::new(),
    }
}

fn promotion(code: &str, discount: Discount, usage_limit: i64) -> NewPromotion {
    let now = Utc::now();
    NewPromotion {
        code: code.to_string(),
        description: None,
        discount,
        minimum_purchase_cents: 0,
        valid_from: now - ChronoDuration::days(1),
        valid_until: now + ChronoDuration::days(30),
        usage_limit,
        product_ids: Vec::new(),
        category_ids: Vec::new(),
        active: true,
    }
}

async fn spawn_app(gateway: FakeGateway) -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    for (id, name) in [("smartphones", "Smartphones"), ("audio", "Audio")] {
        db.categories()
            .insert(&NewCategory {
                id: id.to_string(),
                name: name.to_string(),
                description: String::new(),
                image: None,
            })
            .await
            .unwrap();
    }

    let products = db.products();
    products
        .insert(&product("phone", "Samsung Galaxy S23", 84_900, "smartphones", true))
        .await
        .unwrap();
    products
        .insert(&product("earbuds", "AirPods Pro", 27_900, "audio", true))
        .await
        .unwrap();
    products
        .insert(&product("radio", "Vintage Radio", 1_500, "audio", false))
        .await
        .unwrap();

    let promotions = db.promotions();
    promotions
        .insert(&promotion("WELCOME10", Discount::Percentage { bps: 1_000 }, 0))
        .await
        .unwrap();
    promotions
        .insert(&promotion("ONCE", Discount::FixedAmount { cents: 1_000 }, 1))
        .await
        .unwrap();

    let gateway = Arc::new(gateway);
    let state = AppState::new(test_config(), db.clone(), gateway.clone());

    TestApp {
        router: build_router(state),
        db,
        gateway,
    }
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    /// `name=value` part of the cart Set-Cookie header.
    fn cart_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("cart-storage="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Adds products to a fresh cart and returns the resulting cookie.
async fn cart_with(app: &TestApp, items: &[(&str, i64)]) -> String {
    let mut cookie: Option<String> = None;
    for (product_id, quantity) in items {
        let response = send(
            app,
            "POST",
            "/api/cart/items",
            Some(json!({ "productId": product_id, "quantity": quantity })),
            cookie.as_deref(),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        cookie = response.cart_cookie();
    }
    cookie.expect("cart cookie")
}

fn checkout_body(promo_code: Option<&str>) -> Value {
    json!({
        "customer": {
            "name": "Jean Dupont",
            "email": "jean@example.com",
            "address": "12 rue de la Paix",
            "city": "Paris",
            "postalCode": "75002",
            "country": "France"
        },
        "promoCode": promo_code
    })
}

// =============================================================================
// Health & Catalog
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app(FakeGateway::default()).await;

    let live = send(&app, "GET", "/health", None, None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body["status"], "ok");

    let ready = send(&app, "GET", "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["database"], "ok");
    assert_eq!(ready.body["migrationsApplied"], ready.body["migrationsTotal"]);
}

#[tokio::test]
async fn test_product_listing_and_lookup() {
    let app = spawn_app(FakeGateway::default()).await;

    let audio = send(&app, "GET", "/api/products?category=audio&sort=price-asc", None, None).await;
    assert_eq!(audio.status, StatusCode::OK);
    let ids: Vec<&str> = audio
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["radio", "earbuds"]);

    let found = send(&app, "GET", "/api/products?search=galaxy", None, None).await;
    assert_eq!(found.body.as_array().unwrap().len(), 1);

    let missing = send(&app, "GET", "/api/products/nope", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["code"], "NOT_FOUND");

    let categories = send(&app, "GET", "/api/categories", None, None).await;
    let audio = categories
        .body
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == "audio")
        .unwrap();
    assert_eq!(audio["productCount"], 2);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_round_trip_through_cookie() {
    let app = spawn_app(FakeGateway::default()).await;

    let cookie = cart_with(&app, &[("earbuds", 2), ("earbuds", 3), ("phone", 1)]).await;

    let cart = send(&app, "GET", "/api/cart", None, Some(&cookie)).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart.body["items"][0]["quantity"], 5);
    // Display details are filled from the catalog, not carried in the cookie.
    assert_eq!(cart.body["items"][0]["name"], "AirPods Pro");
    assert_eq!(cart.body["items"][0]["categoryId"], "audio");
    assert_eq!(cart.body["totals"]["totalCents"], 5 * 27_900 + 84_900);
    assert!(cart.body.get("cartReset").is_none());

    let updated = send(
        &app,
        "PATCH",
        "/api/cart/items/earbuds",
        Some(json!({ "quantity": 0 })),
        Some(&cookie),
    )
    .await;
    assert_eq!(updated.body["items"].as_array().unwrap().len(), 1);

    let cookie = updated.cart_cookie().unwrap();
    let removed = send(&app, "DELETE", "/api/cart/items/not-in-cart", None, Some(&cookie)).await;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(removed.body["totals"]["totalCents"], 84_900);
}

#[tokio::test]
async fn test_cart_rejects_out_of_stock_and_unknown_products() {
    let app = spawn_app(FakeGateway::default()).await;

    let sold_out = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": "radio" })),
        None,
    )
    .await;
    assert_eq!(sold_out.status, StatusCode::BAD_REQUEST);
    assert_eq!(sold_out.body["code"], "VALIDATION_ERROR");

    let unknown = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": "nope", "quantity": 1 })),
        None,
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_huge_quantity_on_existing_entry_is_rejected() {
    let app = spawn_app(FakeGateway::default()).await;
    let cookie = cart_with(&app, &[("earbuds", 1)]).await;

    let response = send(
        &app,
        "POST",
        "/api/cart/items",
        Some(json!({ "productId": "earbuds", "quantity": i64::MAX })),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "VALIDATION_ERROR");
    assert!(response.cart_cookie().is_none());

    let cart = send(&app, "GET", "/api/cart", None, Some(&cookie)).await;
    assert_eq!(cart.body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_forged_price_in_cookie_resets_cart() {
    let app = spawn_app(FakeGateway::default()).await;

    // {"version":2,"items":[{"productId":"phone","quantity":2,"unitPriceCents":9000000000000000000}]}
    let forged = "cart-storage=%7B%22version%22%3A2%2C%22items%22%3A%5B%7B%22productId%22%3A%22phone%22%2C%22quantity%22%3A2%2C%22unitPriceCents%22%3A9000000000000000000%7D%5D%7D";

    let cart = send(&app, "GET", "/api/cart", None, Some(forged)).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["cartReset"], true);
    assert_eq!(cart.body["totals"]["totalCents"], 0);

    let applied = send(
        &app,
        "POST",
        "/api/promotions/apply",
        Some(json!({ "code": "WELCOME10" })),
        Some(forged),
    )
    .await;
    assert_eq!(applied.status, StatusCode::OK);
    assert_eq!(applied.body["discountAmount"], 0);
    assert_eq!(applied.body["totalAfterDiscount"], 0);
}

#[tokio::test]
async fn test_corrupt_cart_cookie_is_reset() {
    let app = spawn_app(FakeGateway::default()).await;

    let cart = send(&app, "GET", "/api/cart", None, Some("cart-storage=%7Bbroken")).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["cartReset"], true);
    assert!(cart.body["items"].as_array().unwrap().is_empty());
    assert_eq!(cart.cart_cookie().as_deref(), Some("cart-storage="));
}

// =============================================================================
// Promotions & Checkout
// =============================================================================

#[tokio::test]
async fn test_apply_promotion_is_case_insensitive() {
    let app = spawn_app(FakeGateway::default()).await;
    let cookie = cart_with(&app, &[("earbuds", 1)]).await;

    let applied = send(
        &app,
        "POST",
        "/api/promotions/apply",
        Some(json!({ "code": "welcome10" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(applied.status, StatusCode::OK);
    assert_eq!(applied.body["valid"], true);
    assert_eq!(applied.body["discountAmount"], 2_790);
    assert_eq!(applied.body["totalAfterDiscount"], 25_110);

    let refused = send(
        &app,
        "POST",
        "/api/promotions/apply",
        Some(json!({ "code": "NOPE" })),
        Some(&cookie),
    )
    .await;
    assert_eq!(refused.status, StatusCode::OK);
    assert_eq!(refused.body["valid"], false);
    assert_eq!(refused.body["reason"], "not_found");
    assert_eq!(refused.body["discountAmount"], 0);
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let app = spawn_app(FakeGateway::default()).await;
    let cookie = cart_with(&app, &[("earbuds", 2)]).await;

    let response = send(
        &app,
        "POST",
        "/api/checkout",
        Some(checkout_body(Some("welcome10"))),
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let order = &response.body["order"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["paymentStatus"], "pending");
    assert_eq!(order["subtotalCents"], 55_800);
    assert_eq!(order["discountCents"], 5_580);
    assert_eq!(order["shippingCents"], 599);
    assert_eq!(order["totalCents"], 50_819);
    assert_eq!(order["items"][0]["unitPriceCents"], 27_900);
    assert_eq!(response.body["clientSecret"], "pi_test_1_secret");
    assert_eq!(response.cart_cookie().as_deref(), Some("cart-storage="));

    let order_number = order["orderNumber"].as_str().unwrap().to_string();
    {
        let requests = app.gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount_cents, 50_819);
        assert_eq!(requests[0].currency, "eur");
        assert_eq!(requests[0].idempotency_key.as_deref(), Some(order_number.as_str()));
        assert_eq!(requests[0].metadata["order_number"], order_number);
    }

    let stored = app
        .db
        .orders()
        .get(order["id"].as_str().unwrap())
        .await
        .unwrap();
    assert_eq!(stored.total_cents, 50_819);
    assert_eq!(stored.payment_intent_id.as_deref(), Some("pi_test_1"));

    let promo = app.db.promotions().get_by_code("WELCOME10").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 1);
}

#[tokio::test]
async fn test_limited_promotion_is_redeemed_once() {
    let app = spawn_app(FakeGateway::default()).await;

    let cookie = cart_with(&app, &[("earbuds", 1)]).await;
    let first = send(&app, "POST", "/api/checkout", Some(checkout_body(Some("ONCE"))), Some(&cookie)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["order"]["discountCents"], 1_000);

    let cookie = cart_with(&app, &[("earbuds", 1)]).await;
    let second = send(&app, "POST", "/api/checkout", Some(checkout_body(Some("ONCE"))), Some(&cookie)).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.body["code"], "VALIDATION_ERROR");

    let promo = app.db.promotions().get_by_code("once").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 1);
}

#[tokio::test]
async fn test_checkout_validation_errors() {
    let app = spawn_app(FakeGateway::default()).await;

    let empty = send(&app, "POST", "/api/checkout", Some(checkout_body(None)), None).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["code"], "VALIDATION_ERROR");

    let cookie = cart_with(&app, &[("phone", 1)]).await;
    let mut body = checkout_body(None);
    body["customer"]["email"] = json!("not-an-email");
    let bad_email = send(&app, "POST", "/api/checkout", Some(body), Some(&cookie)).await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    assert!(app.gateway.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_failure_persists_nothing() {
    let app = spawn_app(FakeGateway {
        fail: true,
        ..FakeGateway::default()
    })
    .await;
    let cookie = cart_with(&app, &[("phone", 1)]).await;

    let response = send(&app, "POST", "/api/checkout", Some(checkout_body(Some("WELCOME10"))), Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["code"], "PAYMENT_ERROR");
    assert!(response.cart_cookie().is_none());

    let orders = send(&app, "GET", "/api/admin/orders", None, None).await;
    assert!(orders.body.as_array().unwrap().is_empty());

    let promo = app.db.promotions().get_by_code("WELCOME10").await.unwrap().unwrap();
    assert_eq!(promo.usage_count, 0);
}

#[tokio::test]
async fn test_create_payment_intent() {
    let app = spawn_app(FakeGateway::default()).await;

    let ok = send(
        &app,
        "POST",
        "/api/create-payment-intent",
        Some(json!({ "amount": 4_999, "customerEmail": "jean@example.com" })),
        None,
    )
    .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["clientSecret"], "pi_test_1_secret");

    let zero = send(
        &app,
        "POST",
        "/api/create-payment-intent",
        Some(json!({ "amount": 0, "customerEmail": "jean@example.com" })),
        None,
    )
    .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.gateway.requests.lock().unwrap().len(), 1);
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_admin_order_lifecycle() {
    let app = spawn_app(FakeGateway::default()).await;
    let cookie = cart_with(&app, &[("phone", 1)]).await;
    let placed = send(&app, "POST", "/api/checkout", Some(checkout_body(None)), Some(&cookie)).await;
    let id = placed.body["order"]["id"].as_str().unwrap().to_string();

    let detail = send(&app, "GET", &format!("/api/admin/orders/{id}"), None, None).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(
        detail.body["allowedNextStatuses"],
        json!(["processing", "shipped", "delivered", "cancelled"])
    );

    let shipped = send(
        &app,
        "PUT",
        &format!("/api/admin/orders/{id}/status"),
        Some(json!({ "status": "shipped" })),
        None,
    )
    .await;
    assert_eq!(shipped.status, StatusCode::OK);
    assert_eq!(shipped.body["status"], "shipped");

    let cancel = send(
        &app,
        "PUT",
        &format!("/api/admin/orders/{id}/status"),
        Some(json!({ "status": "cancelled" })),
        None,
    )
    .await;
    assert_eq!(cancel.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(cancel.body["code"], "BUSINESS_LOGIC");

    let paid = send(
        &app,
        "PUT",
        &format!("/api/admin/orders/{id}/payment-status"),
        Some(json!({ "paymentStatus": "paid" })),
        None,
    )
    .await;
    assert_eq!(paid.body["paymentStatus"], "paid");

    let stored = app.db.orders().get(&id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Shipped);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);

    let unknown = send(
        &app,
        "PUT",
        "/api/admin/orders/nope/status",
        Some(json!({ "status": "processing" })),
        None,
    )
    .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let dashboard = send(&app, "GET", "/api/admin/dashboard", None, None).await;
    assert_eq!(dashboard.body["orders"]["totalOrders"], 1);
    assert_eq!(dashboard.body["orders"]["totalSalesCents"], 84_900 + 599);
    assert_eq!(dashboard.body["products"]["outOfStock"], 1);
}

#[tokio::test]
async fn test_admin_promotions_crud() {
    let app = spawn_app(FakeGateway::default()).await;
    let now = Utc::now();

    let body = json!({
        "code": "summer2025",
        "discount": { "kind": "percentage", "bps": 1500 },
        "validFrom": (now + ChronoDuration::days(10)).to_rfc3339(),
        "validUntil": (now + ChronoDuration::days(40)).to_rfc3339()
    });
    let created = send(&app, "POST", "/api/admin/promotions", Some(body.clone()), None).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["code"], "SUMMER2025");
    assert_eq!(created.body["phase"], "upcoming");

    let duplicate = send(&app, "POST", "/api/admin/promotions", Some(body), None).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.body["code"], "CONFLICT");

    let upcoming = send(&app, "GET", "/api/admin/promotions?status=upcoming", None, None).await;
    assert_eq!(upcoming.body.as_array().unwrap().len(), 1);

    let id = created.body["id"].as_str().unwrap();
    let deleted = send(&app, "DELETE", &format!("/api/admin/promotions/{id}"), None, None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = send(&app, "GET", &format!("/api/admin/promotions/{id}"), None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_moderation_updates_rating() {
    let app = spawn_app(FakeGateway::default()).await;

    let user = send(
        &app,
        "POST",
        "/api/admin/users",
        Some(json!({ "name": "Marie Martin", "email": "marie@example.com" })),
        None,
    )
    .await;
    assert_eq!(user.status, StatusCode::CREATED);
    let user_id = user.body["id"].as_str().unwrap().to_string();

    let review = send(
        &app,
        "POST",
        "/api/products/earbuds/reviews",
        Some(json!({
            "userId": user_id,
            "userName": "Marie",
            "rating": 4,
            "comment": "Très bon son"
        })),
        None,
    )
    .await;
    assert_eq!(review.status, StatusCode::CREATED);
    assert_eq!(review.body["status"], "pending");

    let visible = send(&app, "GET", "/api/products/earbuds/reviews", None, None).await;
    assert!(visible.body.as_array().unwrap().is_empty());

    let review_id = review.body["id"].as_str().unwrap();
    let approved = send(
        &app,
        "PUT",
        &format!("/api/admin/reviews/{review_id}/status"),
        Some(json!({ "status": "approved" })),
        None,
    )
    .await;
    assert_eq!(approved.status, StatusCode::OK);

    let product = send(&app, "GET", "/api/products/earbuds", None, None).await;
    assert_eq!(product.body["rating"], 4.0);
    assert_eq!(product.body["reviewCount"], 1);

    let history = send(&app, "GET", &format!("/api/users/{user_id}/reviews"), None, None).await;
    assert_eq!(history.body.as_array().unwrap().len(), 1);

    let bad_rating = send(
        &app,
        "POST",
        "/api/products/earbuds/reviews",
        Some(json!({ "userId": user_id, "userName": "Marie", "rating": 6, "comment": "!" })),
        None,
    )
    .await;
    assert_eq!(bad_rating.status, StatusCode::BAD_REQUEST);
}
