//! The cart state container.

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::storage::{CART_STORAGE_KEY, CartStorage, decode_items, encode_items};
use super::{CartItemCandidate, CartLineItem, CartSnapshot, cart_total, item_count};
use crate::ProductId;

/// Single source of truth for a shopper's in-progress order.
///
/// Every mutating call writes the new state to storage before returning and
/// publishes a [`CartSnapshot`] to subscribers. None of the operations fail:
/// unknown ids are no-ops and non-positive quantities remove the line.
///
/// # Example
///
/// ```
/// use clearsight_core::cart::{CartItemCandidate, CartStore, MemoryStorage};
/// use clearsight_core::ProductId;
/// use rust_decimal::Decimal;
///
/// let mut cart = CartStore::open(MemoryStorage::new());
/// let id = ProductId::parse("p1").unwrap();
/// let aviator = CartItemCandidate::new(id.clone(), "Aviator", Decimal::new(1500, 0), "🕶️").unwrap();
///
/// cart.add_item(aviator.clone());
/// cart.add_item(aviator);
/// assert_eq!(cart.item_count(), 2);
/// assert_eq!(cart.total(), Decimal::new(3000, 0));
///
/// cart.update_quantity(&id, 0);
/// assert!(cart.is_empty());
/// ```
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
    observers: watch::Sender<CartSnapshot>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a cart backed by `storage`, restoring any persisted lines.
    ///
    /// Missing, unreadable or invalid persisted state yields an empty cart.
    pub fn open(storage: S) -> Self {
        let items = restore(&storage);
        let (observers, _) = watch::channel(CartSnapshot::from_items(&items));
        Self {
            items,
            storage,
            observers,
        }
    }

    /// Add one unit of a product.
    ///
    /// An existing line for the same id gains one unit and keeps the name,
    /// price and image it was first added with. Otherwise a new line with
    /// quantity 1 is appended.
    pub fn add_item(&mut self, candidate: CartItemCandidate) {
        match self.position(candidate.id()) {
            Some(idx) => {
                if let Some(line) = self.items.get_mut(idx) {
                    line.quantity = line.quantity.saturating_add(1);
                    debug!(product_id = %line.id, quantity = line.quantity.get(), "cart line incremented");
                }
            }
            None => {
                debug!(product_id = %candidate.id(), "cart line added");
                self.items.push(CartLineItem::from_candidate(candidate));
            }
        }
        self.commit();
    }

    /// Set a line's quantity exactly.
    ///
    /// `new_quantity <= 0` removes the line. Unknown ids are ignored: nothing
    /// is written and subscribers are not woken.
    pub fn update_quantity(&mut self, id: &ProductId, new_quantity: i64) {
        let Some(quantity) = u32::try_from(new_quantity.max(0))
            .map_or(Some(NonZeroU32::MAX), NonZeroU32::new)
        else {
            self.remove_item(id);
            return;
        };

        let Some(line) = self.items.iter_mut().find(|line| &line.id == id) else {
            return;
        };
        line.quantity = quantity;
        debug!(product_id = %id, quantity = quantity.get(), "cart line quantity set");
        self.commit();
    }

    /// Remove the line for `id` if present. Absent ids change nothing.
    pub fn remove_item(&mut self, id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|line| &line.id != id);
        if self.items.len() != before {
            self.commit();
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.items)
    }

    /// Sum of `price × quantity`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        cart_total(&self.items)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current state with derived totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_items(&self.items)
    }

    /// Receive a snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.observers.subscribe()
    }

    /// Borrow the backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the cart and return its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|line| &line.id == id)
    }

    /// Persist, then notify. A failed write is logged and the in-memory
    /// state stays authoritative.
    fn commit(&mut self) {
        match encode_items(&self.items) {
            Ok(raw) => {
                if let Err(e) = self.storage.write(CART_STORAGE_KEY, raw) {
                    warn!(error = %e, "failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode cart"),
        }
        self.observers.send_replace(self.snapshot());
    }
}

fn restore<S: CartStorage>(storage: &S) -> Vec<CartLineItem> {
    let raw = match storage.read(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "cart storage unreadable, starting empty");
            return Vec::new();
        }
    };

    decode_items(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "discarding persisted cart");
        Vec::new()
    })
}
