//! Session-persisted cart storage.
//!
//! The cart lives in the browser's session as a JSON string under the
//! legacy key, so carts written by earlier frontends keep working. Loading
//! never fails: missing or malformed data resets the store to an empty
//! array and returns an empty cart.

use huerta_core::Cart;
use tower_sessions::Session;

/// Session keys for cart data.
pub mod keys {
    /// Key holding the serialized cart (legacy name, kept for continuity).
    pub const CART: &str = "carrito";
}

/// Load the cart from the session.
///
/// Missing or malformed persisted data self-heals: the session value is
/// rewritten to `[]` (mirroring the legacy store's seed-on-first-read
/// behavior) and an empty cart is returned. Never errors.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<String>(keys::CART).await {
        Ok(Some(raw)) => {
            if let Some(cart) = Cart::from_json(&raw) {
                return cart;
            }
            tracing::warn!("Malformed persisted cart, resetting to empty");
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable persisted cart, resetting to empty");
        }
    }

    if let Err(e) = session.insert(keys::CART, "[]").await {
        tracing::error!(error = %e, "Failed to reset persisted cart");
    }
    Cart::default()
}

/// Persist the cart to the session.
///
/// # Errors
///
/// Returns the session store error; callers surface it as a non-fatal
/// user-visible notice.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart.to_json()).await
}
