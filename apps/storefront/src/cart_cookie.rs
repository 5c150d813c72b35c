//! Cookie-backed cart storage.
//!
//! The cart lives entirely in the `cart-storage` cookie as a compact
//! snapshot (product id, quantity, frozen price). Each request rebuilds the
//! cart from the request's [`CookieJar`]; mutations put a replacement cookie
//! in the jar, which the handler hands back with its response. The jar
//! percent-encodes the value on the way out and decodes it on the way in.
//!
//! Browsers silently drop a `Set-Cookie` above ~4 KB, which would leave the
//! client holding a stale cart, so an oversized snapshot is refused before
//! the cart changes.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use tracing::warn;

use electroshop_core::{CartStorage, CoreError, CoreResult, PersistentCart};
use electroshop_db::Database;

use crate::error::ApiResult;

/// Cookie holding the cart snapshot.
pub const CART_COOKIE: &str = "cart-storage";

/// Largest `Set-Cookie` value (name, encoded value and attributes) we send.
pub const MAX_CART_COOKIE_BYTES: usize = 4096;

const CART_COOKIE_MAX_AGE: Duration = Duration::weeks(1);

/// A cart bound to the request's cookie jar.
pub type CookieCart = PersistentCart<CookieCartStorage>;

/// [`CartStorage`] over the request/response cookie jar.
#[derive(Debug, Default)]
pub struct CookieCartStorage {
    jar: CookieJar,
}

impl CookieCartStorage {
    pub fn new(jar: CookieJar) -> Self {
        CookieCartStorage { jar }
    }

    /// The jar to return with the response; carries any pending cart write.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

fn cart_cookie(snapshot: String) -> Cookie<'static> {
    Cookie::build((CART_COOKIE, snapshot))
        .path("/")
        .max_age(CART_COOKIE_MAX_AGE)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

impl CartStorage for CookieCartStorage {
    fn load(&self) -> Option<String> {
        self.jar.get(CART_COOKIE).map(|c| c.value().to_string())
    }

    fn save(&mut self, snapshot: String) -> CoreResult<()> {
        let cookie = cart_cookie(snapshot);
        let size = cookie.encoded().to_string().len();
        if size > MAX_CART_COOKIE_BYTES {
            return Err(CoreError::CartSnapshotTooLarge {
                size,
                max: MAX_CART_COOKIE_BYTES,
            });
        }
        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(())
    }

    fn clear(&mut self) {
        let removal = Cookie::build(CART_COOKIE)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        self.jar = std::mem::take(&mut self.jar).remove(removal);
    }
}

/// Opens the request's cart without catalog details. An unreadable cookie
/// yields an empty cart and is scheduled for removal.
pub fn open_cart(jar: CookieJar) -> CookieCart {
    let cart = PersistentCart::open(CookieCartStorage::new(jar));
    if let Some(err) = cart.restore_error() {
        warn!(error = %err, "Discarding unreadable cart cookie");
    }
    cart
}

/// Opens the request's cart and fills names, images and categories from the
/// catalog.
pub async fn load_cart(db: &Database, jar: CookieJar) -> ApiResult<CookieCart> {
    let mut cart = open_cart(jar);
    if !cart.cart().is_empty() {
        let catalog = db.products().get_many(&cart.cart().product_ids()).await?;
        cart.refresh_details(&catalog);
    }
    Ok(cart)
}
