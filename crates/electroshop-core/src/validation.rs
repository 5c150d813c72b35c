//! # Validation Module
//!
//! Input validation for ElectroShop payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront forms                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (serde deserialization)                           │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK / NOT NULL constraints                                      │
//! │  ├── UNIQUE constraints (promotion code, user email)                   │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.
//!
//! ## Usage
//! ```rust
//! use electroshop_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("client@example.com").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::order::CustomerDetails;
use crate::types::{Discount, NewCategory, NewProduct, NewPromotion, NewReview, NewUser};
use crate::{MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Primitives
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn length_between(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    required(field, value)?;

    let len = value.trim().chars().count();
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
///
/// ## Example
/// ```rust
/// use electroshop_core::validation::validate_email;
///
/// assert!(validate_email("jean.dupont@example.fr").is_ok());
/// assert!(validate_email("jean.dupont@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot < domain.len() - 1 && !domain.starts_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be between 1 and `MAX_ITEM_QUANTITY` (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items); the ceiling is
/// `MAX_UNIT_PRICE_CENTS`.
pub fn validate_price(field: &str, price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if price_cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a promotion code.
///
/// ## Rules
/// - 3 to 32 characters after trimming
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use electroshop_core::validation::validate_promotion_code;
///
/// assert!(validate_promotion_code("SUMMER2023").is_ok());
/// assert!(validate_promotion_code("10 OFF").is_err());
/// ```
pub fn validate_promotion_code(code: &str) -> ValidationResult<()> {
    length_between("code", code, 3, 32)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }
    Ok(())
}

/// Validates an ISO 4217 currency code (three ASCII letters).
pub fn validate_currency(currency: &str) -> ValidationResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter ISO currency code".to_string(),
        });
    }
    Ok(())
}

/// Validates a category slug: lowercase letters, digits and hyphens.
pub fn validate_slug(field: &str, slug: &str) -> ValidationResult<()> {
    length_between(field, slug, 2, 64)?;

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only lowercase letters, numbers, and hyphens".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates the checkout form.
///
/// ## Rules
/// | Field        | Rule             |
/// |--------------|------------------|
/// | name         | ≥ 2 characters   |
/// | email        | valid address    |
/// | address      | ≥ 5 characters   |
/// | city         | ≥ 2 characters   |
/// | postal_code  | ≥ 4 characters   |
/// | country      | ≥ 2 characters   |
pub fn validate_customer_details(details: &CustomerDetails) -> ValidationResult<()> {
    length_between("name", &details.name, 2, 100)?;
    validate_email(&details.email)?;
    length_between("address", &details.address, 5, 200)?;
    length_between("city", &details.city, 2, 100)?;
    length_between("postalCode", &details.postal_code, 4, 12)?;
    length_between("country", &details.country, 2, 60)?;
    Ok(())
}

/// Validates a product create/replace payload.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    length_between("name", &product.name, 1, 200)?;
    length_between("description", &product.description, 1, 500)?;
    validate_price("price", product.price_cents)?;
    if let Some(old) = product.old_price_cents {
        validate_price("oldPrice", old)?;
    }
    if !(0..=100).contains(&product.discount_percent) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    required("image", &product.image)?;
    validate_slug("category", &product.category_id)?;
    for spec in &product.specifications {
        required("specification name", &spec.name)?;
    }
    Ok(())
}

/// Validates a category create payload.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_slug("id", &category.id)?;
    length_between("name", &category.name, 2, 100)?;
    required("description", &category.description)?;
    Ok(())
}

/// Validates a promotion create/replace payload.
///
/// ## Rules
/// - Code passes [`validate_promotion_code`]
/// - Percentage in (0, 100%], fixed amount > 0
/// - Minimum purchase and usage limit are non-negative
/// - Validity window ends after it starts
pub fn validate_new_promotion(promotion: &NewPromotion) -> ValidationResult<()> {
    validate_promotion_code(&promotion.code)?;

    match promotion.discount {
        Discount::Percentage { bps } if bps == 0 || bps > 10_000 => {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 1,
                max: 10_000,
            });
        }
        Discount::FixedAmount { cents } if cents <= 0 => {
            return Err(ValidationError::MustBePositive {
                field: "discount".to_string(),
            });
        }
        _ => {}
    }

    non_negative("minimumPurchase", promotion.minimum_purchase_cents)?;
    non_negative("usageLimit", promotion.usage_limit)?;

    if promotion.valid_until <= promotion.valid_from {
        return Err(ValidationError::InvalidFormat {
            field: "validUntil".to_string(),
            reason: "must be after validFrom".to_string(),
        });
    }
    Ok(())
}

/// Validates a review submission.
pub fn validate_new_review(review: &NewReview) -> ValidationResult<()> {
    required("userId", &review.user_id)?;
    length_between("userName", &review.user_name, 1, 100)?;
    if !(1..=5).contains(&review.rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }
    length_between("comment", &review.comment, 1, 2_000)?;
    Ok(())
}

/// Validates a user create/replace payload.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    length_between("name", &user.name, 2, 100)?;
    validate_email(&user.email)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "Jean Dupont".to_string(),
            email: "jean@example.com".to_string(),
            address: "12 rue de la Paix".to_string(),
            city: "Paris".to_string(),
            postal_code: "75002".to_string(),
            country: "France".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at.example.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@b.").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price("price", 0).is_ok());
        assert!(validate_price("price", MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price("price", -1),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_price("price", MAX_UNIT_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_customer_details() {
        assert!(validate_customer_details(&details()).is_ok());

        let mut short_address = details();
        short_address.address = "rue".to_string();
        let err = validate_customer_details(&short_address).unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 5, .. }));

        let mut bad_email = details();
        bad_email.email = "jean".to_string();
        assert!(validate_customer_details(&bad_email).is_err());
    }

    #[test]
    fn test_promotion_code() {
        assert!(validate_promotion_code("WELCOME10").is_ok());
        assert!(validate_promotion_code("black-friday").is_ok());
        assert!(validate_promotion_code("AB").is_err());
        assert!(validate_promotion_code("10% OFF").is_err());
    }

    #[test]
    fn test_new_promotion_rules() {
        let now = Utc::now();
        let mut promo = NewPromotion {
            code: "FLASH20".to_string(),
            description: None,
            discount: Discount::Percentage { bps: 2_000 },
            minimum_purchase_cents: 0,
            valid_from: now,
            valid_until: now + Duration::days(3),
            usage_limit: 100,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
        };
        assert!(validate_new_promotion(&promo).is_ok());

        promo.discount = Discount::Percentage { bps: 12_000 };
        assert!(validate_new_promotion(&promo).is_err());

        promo.discount = Discount::FixedAmount { cents: 0 };
        assert!(validate_new_promotion(&promo).is_err());

        promo.discount = Discount::FixedAmount { cents: 599 };
        promo.valid_until = promo.valid_from;
        assert!(validate_new_promotion(&promo).is_err());
    }

    #[test]
    fn test_new_review_rating_range() {
        let mut review = NewReview {
            user_id: "u1".to_string(),
            user_name: "Marie".to_string(),
            rating: 5,
            comment: "Excellent".to_string(),
        };
        assert!(validate_new_review(&review).is_ok());

        review.rating = 6;
        assert!(validate_new_review(&review).is_err());
    }

    #[test]
    fn test_slug() {
        assert!(validate_slug("id", "smartphones").is_ok());
        assert!(validate_slug("id", "Smart Phones").is_err());
    }

    #[test]
    fn test_currency() {
        assert!(validate_currency("eur").is_ok());
        assert!(validate_currency("euro").is_err());
    }
}
