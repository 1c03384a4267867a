//! Session-backed cart.
//!
//! Each visitor's cart lives in their server-side session under
//! [`CART_STORAGE_KEY`], as the same JSON array the store persists anywhere
//! else. A request loads a snapshot of the session, runs the cart operation
//! synchronously against it, then writes the changed keys back.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::Session;

use gototech_core::{
    CART_STORAGE_KEY, Cart, CartEvent, CartStorage, CartStore, MemoryStorage, Notification,
    StorageError, Subscription,
};

/// [`CartStorage`] over a snapshot of one session.
#[derive(Debug, Default)]
pub struct SessionStorage {
    snapshot: MemoryStorage,
    changed: BTreeSet<String>,
}

impl SessionStorage {
    /// Read the cart entry from `session`.
    ///
    /// A session read failure gives an empty snapshot.
    pub async fn load(session: &Session) -> Self {
        let snapshot = match session.get::<String>(CART_STORAGE_KEY).await {
            Ok(Some(raw)) => MemoryStorage::with_entry(CART_STORAGE_KEY, raw),
            Ok(None) => MemoryStorage::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart from session");
                MemoryStorage::new()
            }
        };

        Self {
            snapshot,
            changed: BTreeSet::new(),
        }
    }

    /// Write every changed key back to `session`.
    ///
    /// # Errors
    ///
    /// Returns the session error if the session store rejects the write.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.changed {
            match self.snapshot.read(key) {
                Some(value) => session.insert(key, value).await?,
                None => {
                    session.remove::<String>(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl CartStorage for SessionStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.snapshot.read(key)
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.changed.insert(key.to_owned());
        self.snapshot.write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.changed.insert(key.to_owned());
        self.snapshot.remove(key)
    }
}

/// A cart store bound to one request's session, collecting the notifications
/// its changes produce.
pub struct CartSession {
    store: CartStore<SessionStorage>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    subscription: Subscription,
}

/// What a finished cart session hands back to the handler for rendering.
#[derive(Debug, Clone)]
pub struct CartOutcome {
    pub cart: Cart,
    pub notifications: Vec<Notification>,
}

impl CartSession {
    /// Load the visitor's cart.
    pub async fn open(session: &Session) -> Self {
        let store = CartStore::load(SessionStorage::load(session).await);
        let notifications = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&notifications);
        let subscription = store.subscribe(move |event: &CartEvent| {
            if let Some(notification) = event.notification() {
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(notification);
            }
        });

        Self {
            store,
            notifications,
            subscription,
        }
    }

    /// The store, for running cart operations.
    pub const fn store(&mut self) -> &mut CartStore<SessionStorage> {
        &mut self.store
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.store.cart()
    }

    /// Persist any changes to the session and return the final cart.
    ///
    /// # Errors
    ///
    /// Returns the session error if the session store rejects the write.
    pub async fn close(self, session: &Session) -> Result<CartOutcome, tower_sessions::session::Error> {
        let Self {
            store,
            notifications,
            subscription,
        } = self;
        drop(subscription);

        let cart = store.cart().clone();
        store.into_storage().flush(session).await?;

        let notifications =
            std::mem::take(&mut *notifications.lock().unwrap_or_else(PoisonError::into_inner));

        Ok(CartOutcome {
            cart,
            notifications,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gototech_core::{ProductId, catalog};

    use super::*;

    #[test]
    fn test_session_storage_tracks_changes() {
        let mut storage = SessionStorage::default();
        assert!(storage.changed.is_empty());

        storage.write(CART_STORAGE_KEY, "[]".to_string()).unwrap();
        assert!(storage.changed.contains(CART_STORAGE_KEY));
        assert_eq!(storage.read(CART_STORAGE_KEY).as_deref(), Some("[]"));

        storage.remove(CART_STORAGE_KEY).unwrap();
        assert!(storage.read(CART_STORAGE_KEY).is_none());
        assert_eq!(storage.changed.len(), 1);
    }

    #[test]
    fn test_store_over_session_storage_persists_to_snapshot() {
        let mut store = CartStore::load(SessionStorage::default());
        let headset = catalog::find(&ProductId::new("3")).unwrap();

        store.add(&headset).unwrap();

        let storage = store.into_storage();
        assert!(storage.changed.contains(CART_STORAGE_KEY));
        let cart = Cart::from_json(&storage.read(CART_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(cart.count(), 1);
    }
}
