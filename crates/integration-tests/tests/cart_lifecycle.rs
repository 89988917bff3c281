//! Cart behaviour across store instances sharing one backing store, the way
//! successive requests share a session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use rust_decimal::Decimal;

use clearsight_core::ProductId;
use clearsight_core::cart::{CartItemCandidate, CartStorage, CartStorageError, CartStore};

/// Storage handle whose clones all see the same map.
#[derive(Clone, Default)]
struct SharedStorage(Arc<Mutex<HashMap<String, String>>>);

impl CartStorage for SharedStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        let map = self
            .0
            .lock()
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), CartStorageError> {
        self.0
            .lock()
            .map_err(|e| CartStorageError::Unavailable(e.to_string()))?
            .insert(key.to_owned(), value);
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
fn candidate(id: &str, name: &str, price: i64) -> CartItemCandidate {
    CartItemCandidate::new(ProductId::parse(id).unwrap(), name, Decimal::new(price, 0), "🕶️")
        .unwrap()
}

#[allow(clippy::unwrap_used)]
fn pid(id: &str) -> ProductId {
    ProductId::parse(id).unwrap()
}

#[test]
fn test_each_mutation_is_visible_to_the_next_request() {
    let storage = SharedStorage::default();

    let mut first = CartStore::open(storage.clone());
    first.add_item(candidate("p1", "Aviator", 1500));
    first.add_item(candidate("p2", "Wayfarer", 2500));
    drop(first);

    let mut second = CartStore::open(storage.clone());
    assert_eq!(second.item_count(), 2);
    assert_eq!(second.total(), Decimal::new(4000, 0));
    second.update_quantity(&pid("p1"), 3);
    drop(second);

    let third = CartStore::open(storage);
    assert_eq!(third.total(), Decimal::new(7000, 0));
    let ids: Vec<&str> = third.items().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[test]
fn test_first_add_wins_after_reload() {
    let storage = SharedStorage::default();

    let mut cart = CartStore::open(storage.clone());
    cart.add_item(candidate("p1", "Aviator", 1500));
    drop(cart);

    let mut cart = CartStore::open(storage.clone());
    cart.add_item(candidate("p1", "Aviator Sale", 999));
    drop(cart);

    let cart = CartStore::open(storage);
    let line = cart.line(&pid("p1"));
    assert_eq!(line.map(|l| l.quantity.get()), Some(2));
    assert_eq!(line.map(|l| l.name.as_str()), Some("Aviator"));
    assert_eq!(cart.total(), Decimal::new(3000, 0));
}

#[test]
fn test_clear_then_reload_is_empty() {
    let storage = SharedStorage::default();

    let mut cart = CartStore::open(storage.clone());
    cart.add_item(candidate("p1", "Aviator", 1500));
    cart.clear();
    drop(cart);

    let cart = CartStore::open(storage);
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
    assert_eq!(cart.total(), Decimal::ZERO);
}

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Update(u8, i64),
    Remove(u8),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0_u8..4).prop_map(Op::Add),
        2 => ((0_u8..4), -2_i64..6).prop_map(|(id, q)| Op::Update(id, q)),
        1 => (0_u8..4).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_reloaded_cart_matches_live_cart(ops in proptest::collection::vec(op(), 0..40)) {
        let storage = SharedStorage::default();
        let mut live = CartStore::open(storage.clone());

        for op in ops {
            match op {
                Op::Add(n) => live.add_item(candidate(&format!("p{n}"), "Frame", 1000 + i64::from(n) * 250)),
                Op::Update(n, q) => live.update_quantity(&pid(&format!("p{n}")), q),
                Op::Remove(n) => live.remove_item(&pid(&format!("p{n}"))),
                Op::Clear => live.clear(),
            }

            let reloaded = CartStore::open(storage.clone());
            prop_assert_eq!(reloaded.snapshot(), live.snapshot());
        }
    }
}
