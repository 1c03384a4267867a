//! The persisted cart store.
//!
//! One [`CartStore`] owns the cart for its context. It loads once from the
//! injected [`CartStorage`], writes back after every mutation, then tells its
//! listeners what changed.

use std::collections::HashMap;

use super::events::{CartEvent, Listeners, Subscription};
use super::{Cart, Product};
use crate::types::{Price, ProductId};

/// Storage key holding the persisted cart.
pub const CART_STORAGE_KEY: &str = "gototechCart";

/// Errors writing the persisted cart.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend rejected the write.
    #[error("storage write failed: {0}")]
    Backend(String),
}

/// String key/value storage the cart is persisted to.
///
/// Modelled on browser Web Storage: reads never fail (a missing or unreadable
/// entry is `None`), writes may.
pub trait CartStorage {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend cannot persist the value.
    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Backend` if the backend cannot persist the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and as the base of snapshot backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: CartStorage + ?Sized> CartStorage for &mut S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// The single owner of a cart and its persistence.
///
/// # Example
///
/// ```
/// use gototech_core::{CartStore, MemoryStorage, catalog};
///
/// let mut store = CartStore::load(MemoryStorage::new());
/// let keyboard = catalog::find(&"1".into()).unwrap();
///
/// store.add(&keyboard).unwrap();
/// store.add(&keyboard).unwrap();
///
/// assert_eq!(store.count(), 2);
/// assert_eq!(store.total().to_string(), "S/. 300.00");
/// ```
pub struct CartStore<S: CartStorage> {
    storage: S,
    cart: Cart,
    listeners: Listeners,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from `storage`.
    ///
    /// A missing entry gives an empty cart. So does an entry that does not
    /// parse; that case is logged and otherwise ignored.
    pub fn load(storage: S) -> Self {
        let cart = match storage.read(CART_STORAGE_KEY) {
            Some(raw) => Cart::from_json(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "persisted cart is unreadable, starting empty");
                Cart::new()
            }),
            None => Cart::new(),
        };

        Self {
            storage,
            cart,
            listeners: Listeners::default(),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of quantities (the badge number).
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Sum of `price * quantity`; display rounds to two places.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend, e.g. to flush a snapshot.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Register a listener for every persisted change.
    ///
    /// Listeners run synchronously after the write, in registration order.
    /// They must not subscribe or drop subscriptions of this store from inside
    /// the callback.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted. The in-memory
    /// cart keeps the change.
    pub fn add(&mut self, product: &Product) -> Result<CartEvent, StorageError> {
        let quantity = self.cart.add(product);
        tracing::debug!(product_id = %product.id, quantity, "added to cart");

        self.commit(CartEvent::ItemAdded {
            id: product.id.clone(),
            name: product.name.clone(),
            quantity,
        })
    }

    /// Remove the line for `id`. Unknown ids leave the contents unchanged but
    /// are still persisted and reported.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn remove(&mut self, id: &ProductId) -> Result<CartEvent, StorageError> {
        let existed = self.cart.remove(id).is_some();
        tracing::debug!(product_id = %id, existed, "removed from cart");

        self.commit(CartEvent::ItemRemoved {
            id: id.clone(),
            existed,
        })
    }

    /// Adjust the quantity of `id` by `delta`.
    ///
    /// A result below 1 removes the line. A result above `u32::MAX` is
    /// clamped to `u32::MAX`. Unknown ids do nothing and return `Ok(None)`
    /// without touching storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn update_quantity(
        &mut self,
        id: &ProductId,
        delta: i64,
    ) -> Result<Option<CartEvent>, StorageError> {
        let Some(item) = self.cart.get(id) else {
            return Ok(None);
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next < 1 {
            return self.remove(id).map(Some);
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        self.cart.set_quantity(id, quantity);

        self.commit(CartEvent::QuantityChanged {
            id: id.clone(),
            quantity,
        })
        .map(Some)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<CartEvent, StorageError> {
        self.cart.clear();
        self.commit(CartEvent::Cleared)
    }

    /// Persist the current cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let json = self.cart.to_json()?;
        self.storage.write(CART_STORAGE_KEY, json)
    }

    fn commit(&mut self, event: CartEvent) -> Result<CartEvent, StorageError> {
        self.save()?;
        self.listeners.emit(&event);
        Ok(event)
    }
}

impl<S: CartStorage + std::fmt::Debug> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
