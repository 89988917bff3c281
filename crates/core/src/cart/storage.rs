//! Durable cart storage.
//!
//! The cart is written as a JSON array of line items under a single fixed
//! key. Any textual key-value store can back it: the HTTP service uses the
//! visitor's session record, tests use [`MemoryStorage`].

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::CartLineItem;

/// Key the cart is stored under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors from reading, writing or decoding persisted cart state.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The backing store could not be reached.
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),

    /// The stored value is not valid cart JSON.
    #[error("cart data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The stored value decodes but breaks a cart invariant.
    #[error("cart data is inconsistent: {0}")]
    Inconsistent(String),
}

/// A textual key-value store the cart persists into.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError::Unavailable` if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError::Unavailable` if the store cannot be written.
    fn write(&mut self, key: &str, value: String) -> Result<(), CartStorageError>;
}

/// In-process key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `value` under the cart key.
    #[must_use]
    pub fn with_cart(value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(CART_STORAGE_KEY.to_owned(), value.into());
        Self { entries }
    }

    /// The raw persisted cart, if any.
    #[must_use]
    pub fn cart_value(&self) -> Option<&str> {
        self.entries.get(CART_STORAGE_KEY).map(String::as_str)
    }

    /// Take the raw persisted cart out of the store.
    #[must_use]
    pub fn into_cart_value(mut self) -> Option<String> {
        self.entries.remove(CART_STORAGE_KEY)
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), CartStorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Serialize cart lines for storage.
///
/// # Errors
///
/// Returns `CartStorageError::Malformed` if serialization fails.
pub fn encode_items(items: &[CartLineItem]) -> Result<String, CartStorageError> {
    Ok(serde_json::to_string(items)?)
}

/// Deserialize cart lines, rejecting data that breaks the cart invariants.
///
/// Zero quantities and empty ids are already rejected by the line types;
/// this additionally rejects duplicate ids and negative prices.
///
/// # Errors
///
/// Returns `CartStorageError::Malformed` for invalid JSON and
/// `CartStorageError::Inconsistent` for invariant violations.
pub fn decode_items(raw: &str) -> Result<Vec<CartLineItem>, CartStorageError> {
    let items: Vec<CartLineItem> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if !seen.insert(&item.id) {
            return Err(CartStorageError::Inconsistent(format!(
                "duplicate line for product {}",
                item.id
            )));
        }
        if item.price.is_sign_negative() && !item.price.is_zero() {
            return Err(CartStorageError::Inconsistent(format!(
                "negative price for product {}",
                item.id
            )));
        }
    }

    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid() {
        let raw = r#"[{"id":"p1","name":"Aviator","price":"1500","image":"🕶️","quantity":2}]"#;
        let items = decode_items(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity.get(), 2);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_items("not json"),
            Err(CartStorageError::Malformed(_))
        ));
        assert!(matches!(
            decode_items(r#"{"items":[]}"#),
            Err(CartStorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let raw = r#"[{"id":"p1","name":"A","price":"10","image":"","quantity":0}]"#;
        assert!(matches!(
            decode_items(raw),
            Err(CartStorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_id() {
        let raw = r#"[{"id":"","name":"A","price":"10","image":"","quantity":1}]"#;
        assert!(decode_items(raw).is_err());
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let raw = r#"[
            {"id":"p1","name":"A","price":"10","image":"","quantity":1},
            {"id":"p1","name":"A","price":"10","image":"","quantity":3}
        ]"#;
        assert!(matches!(
            decode_items(raw),
            Err(CartStorageError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_decode_rejects_negative_price() {
        let raw = r#"[{"id":"p1","name":"A","price":"-10","image":"","quantity":1}]"#;
        assert!(matches!(
            decode_items(raw),
            Err(CartStorageError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.read(CART_STORAGE_KEY).unwrap().is_none());

        storage.write(CART_STORAGE_KEY, "[]".to_owned()).unwrap();
        assert_eq!(storage.cart_value(), Some("[]"));
        assert_eq!(storage.into_cart_value().as_deref(), Some("[]"));
    }
}
