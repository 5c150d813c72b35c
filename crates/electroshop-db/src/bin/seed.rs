//! # Seed Data Generator
//!
//! Loads the ElectroShop demo catalog into a database for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./electroshop_dev.db (default)
//! cargo run -p electroshop-db --bin seed
//!
//! # Specify database path
//! cargo run -p electroshop-db --bin seed -- --db ./data/electroshop.db
//! ```
//!
//! ## Generated Data
//! - 5 categories (smartphones, ordinateurs, audio, tablettes, accessoires)
//! - A small catalog with specifications, one item out of stock
//! - An admin and two customers
//! - Promotions: SUMMER2023, WELCOME10, BLACKFRIDAY, FREESHIPPING, FLASH20
//! - Approved and pending reviews (product ratings are derived from them)
//! - One delivered order for the first customer

use anyhow::Context;
use chrono::{Duration, Utc};
use std::env;

use electroshop_core::money::Money;
use electroshop_core::order::{build_order, subtotal, CustomerDetails, OrderTotals, PricedLine};
use electroshop_core::{
    Discount, NewCategory, NewProduct, NewPromotion, NewReview, NewUser, OrderStatus,
    PaymentStatus, ReviewStatus, Specification, UserRole, DEFAULT_SHIPPING_CENTS,
};
use electroshop_db::{Database, DbConfig};

/// (slug, name, description)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("smartphones", "Smartphones", "Les derniers smartphones des grandes marques"),
    ("ordinateurs", "Ordinateurs", "Portables et ordinateurs de bureau"),
    ("audio", "Audio", "Casques, écouteurs et enceintes"),
    ("tablettes", "Tablettes", "Tablettes tactiles pour le travail et les loisirs"),
    ("accessoires", "Accessoires", "Chargeurs, câbles et protections"),
];

/// (id, name, description, price_cents, old_price_cents, discount %, category, in_stock, specs)
type ProductSeed = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    Option<i64>,
    i64,
    &'static str,
    bool,
    &'static [(&'static str, &'static str)],
);

const PRODUCTS: &[ProductSeed] = &[
    (
        "1",
        "Smartphone XYZ Pro",
        "Le dernier smartphone avec un appareil photo exceptionnel.",
        89_999,
        Some(99_999),
        10,
        "smartphones",
        true,
        &[("Processeur", "Octa-core 2.8GHz"), ("RAM", "8GB"), ("Stockage", "256GB")],
    ),
    (
        "2",
        "Ordinateur Portable UltraBook",
        "Un ordinateur portable léger et puissant pour les professionnels.",
        129_999,
        None,
        0,
        "ordinateurs",
        true,
        &[("Processeur", "Intel Core i7"), ("RAM", "16GB DDR4"), ("Stockage", "512GB NVMe SSD")],
    ),
    (
        "3",
        "Écouteurs Sans Fil Pro",
        "Réduction de bruit active pour une expérience audio immersive.",
        19_999,
        None,
        0,
        "audio",
        true,
        &[("Connectivité", "Bluetooth 5.2"), ("Résistance", "IPX4")],
    ),
    (
        "4",
        "Tablette Tab S",
        "Écran 11 pouces, idéale pour le dessin et le streaming.",
        54_999,
        Some(64_999),
        15,
        "tablettes",
        true,
        &[("Écran", "11\" LCD 120Hz"), ("Stockage", "128GB")],
    ),
    (
        "5",
        "Enceinte Bluetooth Boom",
        "Son puissant et 20 heures d'autonomie.",
        7_999,
        None,
        0,
        "audio",
        false,
        &[("Autonomie", "20h"), ("Étanchéité", "IP67")],
    ),
    (
        "6",
        "Chargeur Rapide 65W",
        "Chargeur USB-C compatible ordinateurs et smartphones.",
        3_499,
        None,
        0,
        "accessoires",
        true,
        &[("Puissance", "65W"), ("Ports", "2x USB-C")],
    ),
    (
        "7",
        "Smartphone Lite 5G",
        "La 5G à petit prix.",
        29_999,
        None,
        0,
        "smartphones",
        true,
        &[("RAM", "4GB"), ("Stockage", "128GB")],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./electroshop_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("ElectroShop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./electroshop_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ElectroShop Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {}", db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    for (id, name, description) in CATEGORIES {
        db.categories()
            .insert(&NewCategory {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                image: Some(format!("/images/categories/{}.jpg", id)),
            })
            .await
            .with_context(|| format!("category {}", id))?;
    }
    println!("✓ {} categories", CATEGORIES.len());

    for (id, name, description, price, old_price, discount, category, in_stock, specs) in PRODUCTS {
        db.products()
            .insert(&NewProduct {
                id: Some(id.to_string()),
                name: name.to_string(),
                description: description.to_string(),
                full_description: None,
                price_cents: *price,
                old_price_cents: *old_price,
                discount_percent: *discount,
                image: "/placeholder.svg?height=600&width=600".to_string(),
                category_id: category.to_string(),
                in_stock: *in_stock,
                specifications: specs
                    .iter()
                    .map(|(name, value)| Specification {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            })
            .await
            .with_context(|| format!("product {}", id))?;
    }
    println!("✓ {} products", PRODUCTS.len());

    let users = db.users();
    users
        .insert(&NewUser {
            name: "Admin ElectroShop".to_string(),
            email: "admin@electroshop.fr".to_string(),
            image: None,
            role: UserRole::Admin,
        })
        .await?;
    let jean = users
        .insert(&NewUser {
            name: "Jean Dupont".to_string(),
            email: "jean.dupont@example.fr".to_string(),
            image: None,
            role: UserRole::User,
        })
        .await?;
    let marie = users
        .insert(&NewUser {
            name: "Marie Martin".to_string(),
            email: "marie.martin@example.fr".to_string(),
            image: None,
            role: UserRole::User,
        })
        .await?;
    println!("✓ 3 users");

    seed_promotions(&db).await?;
    println!("✓ 5 promotions");

    let reviews = [
        ("1", &jean, 5, "Excellent téléphone, photos superbes.", ReviewStatus::Approved),
        ("1", &marie, 4, "Très bon mais un peu cher.", ReviewStatus::Approved),
        ("3", &marie, 5, "La réduction de bruit est bluffante.", ReviewStatus::Approved),
        ("2", &jean, 3, "Bon portable, autonomie moyenne.", ReviewStatus::Pending),
    ];
    for (product_id, user, rating, comment, status) in reviews {
        let review = db
            .reviews()
            .insert(
                product_id,
                &NewReview {
                    user_id: user.id.clone(),
                    user_name: user.name.clone(),
                    rating,
                    comment: comment.to_string(),
                },
            )
            .await?;
        if status != ReviewStatus::Pending {
            db.reviews().set_status(&review.id, status).await?;
        }
    }
    println!("✓ {} reviews", reviews.len());

    let lines = vec![
        PricedLine {
            product_id: "1".to_string(),
            name: "Smartphone XYZ Pro".to_string(),
            category_id: "smartphones".to_string(),
            unit_price: Money::from_cents(89_999),
            quantity: 1,
        },
        PricedLine {
            product_id: "6".to_string(),
            name: "Chargeur Rapide 65W".to_string(),
            category_id: "accessoires".to_string(),
            unit_price: Money::from_cents(3_499),
            quantity: 2,
        },
    ];
    let totals = OrderTotals::compute(
        subtotal(&lines),
        Money::zero(),
        Money::from_cents(DEFAULT_SHIPPING_CENTS),
    );
    let customer = CustomerDetails {
        name: jean.name.clone(),
        email: jean.email.clone(),
        address: "12 rue de la Paix".to_string(),
        city: "Paris".to_string(),
        postal_code: "75002".to_string(),
        country: "France".to_string(),
    };
    let order = build_order(
        &customer,
        Some(jean.id.clone()),
        &lines,
        totals,
        None,
        Utc::now() - Duration::days(10),
    );
    db.orders().place(&order, None).await?;
    db.orders()
        .set_status(&order.id, OrderStatus::Pending, OrderStatus::Delivered)
        .await?;
    db.orders()
        .set_payment_status(&order.id, PaymentStatus::Pending, PaymentStatus::Paid)
        .await?;
    println!("✓ 1 order ({})", order.order_number);

    println!();
    println!("✓ Seed complete in {:?}", start.elapsed());

    Ok(())
}

async fn seed_promotions(db: &Database) -> anyhow::Result<()> {
    let now = Utc::now();
    let promotions = [
        NewPromotion {
            code: "SUMMER2023".to_string(),
            description: Some("15% sur tout le site".to_string()),
            discount: Discount::Percentage { bps: 1_500 },
            minimum_purchase_cents: 0,
            valid_from: now - Duration::days(30),
            valid_until: now + Duration::days(60),
            usage_limit: 0,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
        },
        NewPromotion {
            code: "WELCOME10".to_string(),
            description: Some("10% sur votre première commande".to_string()),
            discount: Discount::Percentage { bps: 1_000 },
            minimum_purchase_cents: 0,
            valid_from: now - Duration::days(365),
            valid_until: now + Duration::days(365),
            usage_limit: 0,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
        },
        NewPromotion {
            code: "BLACKFRIDAY".to_string(),
            description: Some("30% sur les ordinateurs".to_string()),
            discount: Discount::Percentage { bps: 3_000 },
            minimum_purchase_cents: 10_000,
            valid_from: now + Duration::days(30),
            valid_until: now + Duration::days(34),
            usage_limit: 500,
            product_ids: Vec::new(),
            category_ids: vec!["ordinateurs".to_string()],
            active: true,
        },
        NewPromotion {
            code: "FREESHIPPING".to_string(),
            description: Some("Livraison offerte dès 50 €".to_string()),
            discount: Discount::FixedAmount {
                cents: DEFAULT_SHIPPING_CENTS,
            },
            minimum_purchase_cents: 5_000,
            valid_from: now - Duration::days(7),
            valid_until: now + Duration::days(90),
            usage_limit: 1_000,
            product_ids: Vec::new(),
            category_ids: Vec::new(),
            active: true,
        },
        NewPromotion {
            code: "FLASH20".to_string(),
            description: Some("Vente flash sur une sélection".to_string()),
            discount: Discount::Percentage { bps: 2_000 },
            minimum_purchase_cents: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(2),
            usage_limit: 100,
            product_ids: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            category_ids: Vec::new(),
            active: false,
        },
    ];

    for promotion in &promotions {
        db.promotions()
            .insert(promotion)
            .await
            .with_context(|| format!("promotion {}", promotion.code))?;
    }

    Ok(())
}
