//! Cart store behavior over shared storage.
//!
//! Covers the persisted format and what happens when more than one store
//! works against the same storage.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use gototech_core::{
    CART_STORAGE_KEY, Cart, CartEvent, CartStorage, CartStore, MemoryStorage, ProductId,
    StorageError, catalog,
};

/// One storage seen by several stores, like browser tabs sharing storage.
#[derive(Clone, Default)]
struct SharedStorage(Rc<RefCell<MemoryStorage>>);

impl CartStorage for SharedStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.0.borrow().read(key)
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.0.borrow_mut().write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.0.borrow_mut().remove(key)
    }
}

fn product(id: &str) -> gototech_core::Product {
    catalog::find(&ProductId::new(id)).unwrap()
}

#[test]
fn test_persisted_format_is_plain_json_array() {
    let mut storage = MemoryStorage::new();
    let mut store = CartStore::load(&mut storage);
    store.add(&product("2")).unwrap();
    drop(store);

    let raw = storage.read(CART_STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let line = &value.as_array().unwrap()[0];

    assert_eq!(line["id"], "2");
    assert_eq!(line["name"], "Mouse Inalámbrico");
    assert_eq!(line["price"].as_f64(), Some(80.0));
    assert_eq!(line["quantity"], 1);
    assert!(line["image"].is_string());
    assert!(line["description"].is_string());
}

#[test]
fn test_loads_cart_written_by_browser() {
    let raw = r#"[
        {"id":"1","name":"Teclado Mecánico RGB","description":"Teclado gaming","price":150,"image":"x","quantity":2},
        {"id":"3","name":"Audífonos Gaming","description":"Audífonos","price":200,"image":"y","quantity":1}
    ]"#;

    let store = CartStore::load(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));

    assert_eq!(store.count(), 3);
    assert_eq!(store.total().display(), "S/. 500.00");
}

#[test]
fn test_fractional_prices_round_for_display() {
    let raw = r#"[{"id":"9","name":"Cable","price":10.125,"quantity":1}]"#;
    let store = CartStore::load(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));

    assert_eq!(store.total().display(), "S/. 10.13");
}

#[test]
fn test_out_of_range_total_saturates() {
    let raw = r#"[{"id":"2","name":"Mouse Inalámbrico","price":1e20,"quantity":4294967295}]"#;
    let mut store = CartStore::load(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));

    assert_eq!(store.total().display(), "S/. 79228162514264337593543950335.00");

    store.add(&product("1")).unwrap();
    assert_eq!(store.count(), u64::from(u32::MAX) + 1);
    assert_eq!(store.total().display(), "S/. 79228162514264337593543950335.00");
}

#[test]
fn test_invalid_entries_load_empty() {
    for raw in ["", "null", "{}", "[{\"id\": 1}]", "not json"] {
        let store = CartStore::load(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));
        assert!(store.cart().is_empty(), "{raw:?} should load empty");
    }
}

#[test]
fn test_second_store_sees_first_after_reload() {
    let mut storage = MemoryStorage::new();

    let mut first = CartStore::load(&mut storage);
    first.add(&product("1")).unwrap();
    drop(first);

    let mut second = CartStore::load(&mut storage);
    assert_eq!(second.count(), 1);
    second.add(&product("1")).unwrap();
    drop(second);

    let cart = Cart::from_json(&storage.read(CART_STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 2);
}

#[test]
fn test_stale_store_overwrites_newer_write() {
    let shared = SharedStorage::default();
    let mut seed = CartStore::load(shared.clone());
    seed.add(&product("1")).unwrap();

    let mut stale = CartStore::load(shared.clone());
    let mut fresh = CartStore::load(shared.clone());
    fresh.add(&product("2")).unwrap();
    stale.add(&product("3")).unwrap();

    // Each store writes its own full cart; the last write wins.
    let reloaded = CartStore::load(shared);
    assert!(reloaded.cart().get(&ProductId::new("2")).is_none());
    assert!(reloaded.cart().get(&ProductId::new("3")).is_some());
    assert_eq!(reloaded.count(), 2);
}

#[test]
fn test_every_operation_is_observable() {
    let mut store = CartStore::load(MemoryStorage::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = store.subscribe(move |event: &CartEvent| {
        sink.lock().unwrap().push(event.clone());
    });

    store.add(&product("1")).unwrap();
    store.update_quantity(&ProductId::new("1"), 2).unwrap();
    store.remove(&ProductId::new("1")).unwrap();
    store.clear().unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(matches!(seen[0], CartEvent::ItemAdded { quantity: 1, .. }));
    assert!(matches!(seen[1], CartEvent::QuantityChanged { quantity: 3, .. }));
    assert!(matches!(seen[2], CartEvent::ItemRemoved { existed: true, .. }));
    assert!(matches!(seen[3], CartEvent::Cleared));
}

#[test]
fn test_dropped_subscription_stops_events() {
    let mut store = CartStore::load(MemoryStorage::new());
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let subscription = store.subscribe(move |_: &CartEvent| {
        *sink.lock().unwrap() += 1;
    });

    store.add(&product("1")).unwrap();
    drop(subscription);
    store.add(&product("1")).unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}
