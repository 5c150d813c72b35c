//! # Cart
//!
//! The shopping cart container and its persisted snapshot.
//!
//! ## Ownership
//! The cart belongs to the client. The server never keeps it between
//! requests: every request rebuilds it from the stored snapshot, mutates it,
//! and writes the full snapshot back.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Persistence Cycle                               │
//! │                                                                         │
//! │  CartStorage::load() ──► CartSnapshot::decode() ──► Cart               │
//! │         ▲                        │                    │                 │
//! │         │                  parse failure?         add / remove /        │
//! │         │                        │                update / clear        │
//! │         │                        ▼                    │                 │
//! │         │               empty cart + CartRestoreError │                 │
//! │         │               (stored value cleared)        ▼                 │
//! │  CartStorage::save() ◄──────────────────── CartSnapshot::encode()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one entry per product (adding again merges quantities)
//! - Every stored quantity is in `1..=MAX_ITEM_QUANTITY`
//! - Every unit price is in `0..=MAX_UNIT_PRICE_CENTS`
//! - At most `MAX_CART_ITEMS` distinct products
//! - `total()` is recomputed from entries on every read
//!
//! The snapshot keeps only product id, quantity and frozen unit price.
//! Display fields (name, image, category) come back from the catalog through
//! [`Cart::refresh_details`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS};

// =============================================================================
// Cart Entry
// =============================================================================

/// One product line in the cart.
///
/// The unit price is frozen when the product is added. Name, image and
/// category are display details filled from the catalog. Checkout re-prices
/// from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartEntry {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub image: String,
    pub category_id: String,
    pub quantity: i64,
}

impl CartEntry {
    /// Creates an entry from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartEntry {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            image: product.image.clone(),
            category_id: product.category_id.clone(),
            quantity,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: an ordered list of entries, unique by product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    items: Vec<CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` of a product, merging with an existing entry.
    ///
    /// ## Errors
    /// - `Validation` if quantity < 1
    /// - `OutOfStock` if the product is flagged out of stock
    /// - `QuantityTooLarge` if the merged quantity exceeds the maximum
    /// - `CartTooLarge` if a new entry would exceed the distinct-product limit
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if !product.in_stock {
            return Err(CoreError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(entry) = self.items.iter_mut().find(|e| e.product_id == product.id) {
            // Both sides are ≤ MAX_ITEM_QUANTITY here.
            let merged = entry.quantity + quantity;
            if merged > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            entry.quantity = merged;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartEntry::from_product(product, quantity));
        Ok(())
    }

    /// Removes a product from the cart.
    ///
    /// Returns whether an entry was removed; removing an absent product is a
    /// no-op.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|e| e.product_id != product_id);
        self.items.len() != before
    }

    /// Overwrites the quantity of a product already in the cart.
    ///
    /// A quantity ≤ 0 removes the entry. Returns whether the cart contained
    /// the product.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove(product_id));
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.items.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => {
                entry.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&CartEntry> {
        self.items.iter().find(|e| e.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all entries (the header badge count).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|e| e.quantity).sum()
    }

    /// Σ unit_price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartEntry::line_total).sum()
    }

    pub fn product_ids(&self) -> Vec<String> {
        self.items.iter().map(|e| e.product_id.clone()).collect()
    }

    /// Copies name, image and category from the catalog onto matching
    /// entries. Quantities and frozen prices are left alone; entries whose
    /// product is gone keep their current details.
    pub fn refresh_details(&mut self, catalog: &[Product]) {
        for entry in &mut self.items {
            if let Some(product) = catalog.iter().find(|p| p.id == entry.product_id) {
                entry.name.clone_from(&product.name);
                entry.image.clone_from(&product.image);
                entry.category_id.clone_from(&product.category_id);
            }
        }
    }

    /// Distinct categories present in the cart, in first-seen order.
    pub fn category_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for entry in &self.items {
            if !ids.contains(&entry.category_id) {
                ids.push(entry.category_id.clone());
            }
        }
        ids
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total_cents: cart.total().cents(),
        }
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Current snapshot schema version.
pub const CART_SNAPSHOT_VERSION: u32 = 2;

/// Version 1 stored display fields as well; they are ignored on read.
const COMPACT_SINCE_VERSION: u32 = 1;

/// Why a stored cart could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartRestoreError {
    /// The stored value is not JSON of any known cart shape.
    #[error("cart snapshot is malformed: {0}")]
    Malformed(String),

    /// Written by a newer (or unknown) schema.
    #[error("cart snapshot version {0} is not supported")]
    UnsupportedVersion(u32),

    /// Parsed, but an entry breaks a cart invariant.
    #[error("cart snapshot entry {product_id} is invalid: {reason}")]
    InvalidEntry { product_id: String, reason: String },
}

/// One line of a persisted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl From<&CartEntry> for SnapshotEntry {
    fn from(entry: &CartEntry) -> Self {
        SnapshotEntry {
            product_id: entry.product_id.clone(),
            quantity: entry.quantity,
            unit_price_cents: entry.unit_price_cents,
        }
    }
}

impl From<SnapshotEntry> for CartEntry {
    fn from(entry: SnapshotEntry) -> Self {
        CartEntry {
            product_id: entry.product_id,
            name: String::new(),
            unit_price_cents: entry.unit_price_cents,
            image: String::new(),
            category_id: String::new(),
            quantity: entry.quantity,
        }
    }
}

/// Versioned, persisted form of a cart.
///
/// ```json
/// { "version": 2, "items": [ { "productId": "1", "quantity": 2, "unitPriceCents": 84900 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub items: Vec<SnapshotEntry>,
}

/// Pre-versioning shape: `{"state":{"items":[...]}}` with decimal prices.
#[derive(Debug, Deserialize)]
struct LegacySnapshot {
    state: LegacyState,
}

#[derive(Debug, Deserialize)]
struct LegacyState {
    items: Vec<LegacyItem>,
}

#[derive(Debug, Deserialize)]
struct LegacyItem {
    id: String,
    price: f64,
    quantity: i64,
}

impl CartSnapshot {
    /// Serializes a cart at the current schema version.
    pub fn encode(cart: &Cart) -> String {
        let snapshot = CartSnapshot {
            version: CART_SNAPSHOT_VERSION,
            items: cart.items.iter().map(SnapshotEntry::from).collect(),
        };
        // Plain strings and integers only; serialization cannot fail.
        serde_json::to_string(&snapshot).unwrap_or_else(|_| String::from("{}"))
    }

    /// Restores a cart from a stored snapshot.
    ///
    /// Accepts the current schema and migrates older shapes. Every restored
    /// entry is re-checked against the cart invariants. Restored entries
    /// carry no display details until [`Cart::refresh_details`] runs.
    pub fn decode(raw: &str) -> Result<Cart, CartRestoreError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| CartRestoreError::Malformed(e.to_string()))?;

        let items: Vec<SnapshotEntry> = if let Some(version) = value.get("version") {
            let version = version
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| CartRestoreError::Malformed("version is not a number".into()))?;
            if !(COMPACT_SINCE_VERSION..=CART_SNAPSHOT_VERSION).contains(&version) {
                return Err(CartRestoreError::UnsupportedVersion(version));
            }
            let snapshot: CartSnapshot = serde_json::from_value(value)
                .map_err(|e| CartRestoreError::Malformed(e.to_string()))?;
            snapshot.items
        } else if value.get("state").is_some() {
            let legacy: LegacySnapshot = serde_json::from_value(value)
                .map_err(|e| CartRestoreError::Malformed(e.to_string()))?;
            legacy
                .state
                .items
                .into_iter()
                .map(|item| SnapshotEntry {
                    product_id: item.id,
                    // Legacy prices were decimal euros.
                    unit_price_cents: (item.price * 100.0).round() as i64,
                    quantity: item.quantity,
                })
                .collect()
        } else {
            return Err(CartRestoreError::Malformed("unrecognized cart shape".into()));
        };

        check_entries(&items)?;
        Ok(Cart {
            items: items.into_iter().map(CartEntry::from).collect(),
        })
    }
}

fn check_entries(items: &[SnapshotEntry]) -> Result<(), CartRestoreError> {
    if items.len() > MAX_CART_ITEMS {
        return Err(CartRestoreError::Malformed(format!(
            "more than {} items",
            MAX_CART_ITEMS
        )));
    }

    for (i, entry) in items.iter().enumerate() {
        let invalid = |reason: &str| CartRestoreError::InvalidEntry {
            product_id: entry.product_id.clone(),
            reason: reason.to_string(),
        };

        if entry.quantity < 1 || entry.quantity > MAX_ITEM_QUANTITY {
            return Err(invalid("quantity out of range"));
        }
        if !(0..=MAX_UNIT_PRICE_CENTS).contains(&entry.unit_price_cents) {
            return Err(invalid("price out of range"));
        }
        if items[..i].iter().any(|e| e.product_id == entry.product_id) {
            return Err(invalid("duplicate product"));
        }
    }

    Ok(())
}

// =============================================================================
// Persistent Cart
// =============================================================================

/// Where a cart snapshot lives between requests (a cookie, local storage,
/// a test buffer).
pub trait CartStorage {
    /// Returns the stored snapshot, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored snapshot.
    ///
    /// Storage with a size limit refuses an oversized snapshot with
    /// [`CoreError::CartSnapshotTooLarge`] and keeps the previous value.
    fn save(&mut self, snapshot: String) -> CoreResult<()>;

    /// Removes the stored snapshot.
    fn clear(&mut self);
}

/// A cart bound to its storage: every successful mutation writes the full
/// snapshot back. A mutation the storage refuses leaves the cart unchanged.
#[derive(Debug)]
pub struct PersistentCart<S: CartStorage> {
    cart: Cart,
    storage: S,
    restore_error: Option<CartRestoreError>,
}

impl<S: CartStorage> PersistentCart<S> {
    /// Loads the cart from storage.
    ///
    /// An unreadable snapshot yields an empty cart; the error is kept for
    /// [`restore_error`](Self::restore_error) and the stored value is
    /// cleared so the failure is reported once.
    pub fn open(mut storage: S) -> Self {
        let (cart, restore_error) = match storage.load() {
            None => (Cart::new(), None),
            Some(raw) => match CartSnapshot::decode(&raw) {
                Ok(cart) => (cart, None),
                Err(err) => {
                    storage.clear();
                    (Cart::new(), Some(err))
                }
            },
        };

        PersistentCart {
            cart,
            storage,
            restore_error,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Set when the stored snapshot had to be discarded on load.
    pub fn restore_error(&self) -> Option<&CartRestoreError> {
        self.restore_error.as_ref()
    }

    pub fn was_reset(&self) -> bool {
        self.restore_error.is_some()
    }

    /// Fills display details from the catalog. Not persisted.
    pub fn refresh_details(&mut self, catalog: &[Product]) {
        self.cart.refresh_details(catalog);
    }

    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        let mut next = self.cart.clone();
        next.add(product, quantity)?;
        self.commit(next)
    }

    pub fn remove(&mut self, product_id: &str) -> CoreResult<bool> {
        let mut next = self.cart.clone();
        let removed = next.remove(product_id);
        self.commit(next)?;
        Ok(removed)
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<bool> {
        let mut next = self.cart.clone();
        let found = next.update_quantity(product_id, quantity)?;
        self.commit(next)?;
        Ok(found)
    }

    pub fn clear(&mut self) -> CoreResult<()> {
        self.commit(Cart::new())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, next: Cart) -> CoreResult<()> {
        self.storage.save(CartSnapshot::encode(&next))?;
        self.cart = next;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
