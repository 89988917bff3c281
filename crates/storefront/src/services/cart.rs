//! Session-backed cart persistence.
//!
//! Each request opens a [`CartStore`] over the serialized lines found in the
//! visitor's session, mutates it, and writes the result back before the
//! response is produced. The session record is the cart's key-value store.

use tower_sessions::Session;
use tracing::warn;

use clearsight_core::cart::{CartStore, MemoryStorage};

use crate::models::session_keys;

/// A cart opened from a session.
pub type SessionCartStore = CartStore<MemoryStorage>;

/// Open the visitor's cart. An unreadable session value yields an empty cart.
pub async fn load(session: &Session) -> SessionCartStore {
    let storage = match session.get::<String>(session_keys::CART).await {
        Ok(Some(raw)) => MemoryStorage::with_cart(raw),
        Ok(None) => MemoryStorage::new(),
        Err(e) => {
            warn!(error = %e, "failed to read cart from session");
            MemoryStorage::new()
        }
    };
    CartStore::open(storage)
}

/// Write the cart back to the session.
///
/// A failed write is logged; the response still reflects the in-memory cart.
pub async fn save(session: &Session, cart: SessionCartStore) {
    let Some(raw) = cart.into_storage().into_cart_value() else {
        return;
    };
    if let Err(e) = session.insert(session_keys::CART, raw).await {
        warn!(error = %e, "failed to persist cart to session");
    }
}
