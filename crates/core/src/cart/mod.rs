//! Shopping cart state.
//!
//! The cart is the one piece of shopper state the storefront owns outright:
//! a sequence of line items keyed by product id, mutated only through
//! [`CartStore`], and persisted to a [`CartStorage`] after every change.
//!
//! # Invariants
//!
//! - At most one line per product id.
//! - Every line has a quantity of at least one; lines that would drop to zero
//!   are removed instead.
//! - Totals are computed from the lines on every read and never stored.
//! - Lines keep their insertion order.

mod storage;
mod store;

pub use storage::{
    CART_STORAGE_KEY, CartStorage, CartStorageError, MemoryStorage, decode_items, encode_items,
};
pub use store::CartStore;

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CurrencyCode, Price, PriceError, ProductId};

/// Reasons a product cannot be offered to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The unit price is negative.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// A product as captured by add-to-cart.
///
/// Construction validates the price, so [`CartStore::add_item`] never has to
/// reject anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemCandidate {
    id: ProductId,
    name: String,
    price: Decimal,
    image: String,
}

impl CartItemCandidate {
    /// Create a candidate line.
    ///
    /// # Errors
    ///
    /// Returns `CandidateError::Price` if `price` is negative.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Result<Self, CandidateError> {
        let price = Price::non_negative(price)?;
        Ok(Self {
            id,
            name: name.into(),
            price: price.amount,
            image: image.into(),
        })
    }

    /// Product id of the candidate.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }
}

/// One product entry in the cart.
///
/// `name`, `price` and `image` are captured when the product is first added
/// and are not refreshed from the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: NonZeroU32,
}

impl CartLineItem {
    fn from_candidate(candidate: CartItemCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            price: candidate.price,
            image: candidate.image,
            quantity: NonZeroU32::MIN,
        }
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }

    /// Unit price in the store currency.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::new(self.price, CurrencyCode::INR)
    }
}

/// Point-in-time view of the cart handed to observers and renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub item_count: u64,
    pub total: Decimal,
}

impl CartSnapshot {
    /// Build a snapshot, deriving the totals from `items`.
    #[must_use]
    pub fn from_items(items: &[CartLineItem]) -> Self {
        Self {
            items: items.to_vec(),
            item_count: item_count(items),
            total: cart_total(items),
        }
    }

    /// Total in the store currency.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::new(self.total, CurrencyCode::INR)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of `price × quantity` over all lines.
#[must_use]
pub fn cart_total(items: &[CartLineItem]) -> Decimal {
    items.iter().map(CartLineItem::line_total).sum()
}

/// Sum of quantities over all lines.
#[must_use]
pub fn item_count(items: &[CartLineItem]) -> u64 {
    items.iter().map(|line| u64::from(line.quantity.get())).sum()
}
