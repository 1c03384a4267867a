//! Cart change events, user-facing notifications, and listener registration.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Severity of a notification shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A transient message for the visitor. Rendering and dismissal belong to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// A persisted change to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded {
        id: ProductId,
        name: String,
        quantity: u32,
    },
    /// Emitted for every remove request, including ids that were not in the cart.
    ItemRemoved { id: ProductId, existed: bool },
    QuantityChanged { id: ProductId, quantity: u32 },
    Cleared,
}

impl CartEvent {
    /// The notification the visitor should see for this change, if any.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        match self {
            Self::ItemAdded { name, .. } => {
                Some(Notification::success(format!("{name} agregado al carrito")))
            }
            Self::ItemRemoved { .. } => {
                Some(Notification::info("Producto eliminado del carrito"))
            }
            Self::QuantityChanged { .. } => None,
            Self::Cleared => Some(Notification::info("Carrito vaciado")),
        }
    }
}

type Listener = Box<dyn Fn(&CartEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Shared list of listeners owned by a store.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    inner: Arc<Mutex<Registry>>,
}

impl Listeners {
    pub(crate) fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        let mut registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn emit(&self, event: &CartEvent) {
        let registry = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, listener) in &registry.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Handle returned by [`CartStore::subscribe`](super::CartStore::subscribe).
///
/// The listener stays registered until this handle is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_notification_levels_serialize_lowercase() {
        let json = serde_json::to_value(Notification::error("boom")).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({"message": "boom", "level": "error"}))
        );
    }

    #[test]
    fn test_added_event_names_product() {
        let event = CartEvent::ItemAdded {
            id: ProductId::new("1"),
            name: "Mouse".to_string(),
            quantity: 1,
        };
        let notification = event.notification();
        assert_eq!(
            notification,
            Some(Notification::success("Mouse agregado al carrito"))
        );
    }

    #[test]
    fn test_removed_event_is_info() {
        let event = CartEvent::ItemRemoved {
            id: ProductId::new("1"),
            existed: false,
        };
        assert_eq!(
            event.notification(),
            Some(Notification::info("Producto eliminado del carrito"))
        );
    }

    #[test]
    fn test_quantity_change_is_silent() {
        let event = CartEvent::QuantityChanged {
            id: ProductId::new("1"),
            quantity: 3,
        };
        assert!(event.notification().is_none());
    }

    #[test]
    fn test_dropping_subscription_stops_delivery() {
        let listeners = Listeners::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = listeners.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        listeners.emit(&CartEvent::Cleared);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(subscription);
        assert_eq!(listeners.len(), 0);

        listeners.emit(&CartEvent::Cleared);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let listeners = Listeners::default();
        let subscription = listeners.subscribe(|_| {});
        drop(listeners);
        subscription.unsubscribe();
    }
}
