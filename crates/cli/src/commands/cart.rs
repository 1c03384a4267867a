//! Terminal cart commands.
//!
//! Each command loads the cart from the `--file` storage, applies one
//! operation, and returns the text to print: any notification the change
//! raised, then the cart listing.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use gototech_core::{Cart, CartStore, Notification, ProductId, catalog};

use super::CommandError;
use crate::storage::FileStorage;

/// Print the cart without changing it.
pub fn show(file: &Path) -> String {
    let store = CartStore::load(FileStorage::new(file));
    render(store.cart(), &[])
}

/// Add one unit of a sample product.
///
/// # Errors
///
/// Returns `CommandError::UnknownProduct` for ids outside the sample catalog,
/// or `CommandError::Storage` if the file cannot be written.
pub fn add(file: &Path, id: &str) -> Result<String, CommandError> {
    let product =
        catalog::find(&ProductId::new(id)).ok_or_else(|| CommandError::UnknownProduct(id.to_string()))?;

    apply(file, |store| store.add(&product).map(drop))
}

/// Remove a line item.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the file cannot be written.
pub fn remove(file: &Path, id: &str) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    apply(file, |store| store.remove(&id).map(drop))
}

/// Adjust a line's quantity by `delta`.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the file cannot be written.
pub fn update(file: &Path, id: &str, delta: i64) -> Result<String, CommandError> {
    let id = ProductId::new(id);
    apply(file, |store| {
        if store.update_quantity(&id, delta)?.is_none() {
            tracing::info!(product_id = %id, "not in cart, nothing to update");
        }
        Ok(())
    })
}

/// Empty the cart.
///
/// # Errors
///
/// Returns `CommandError::Storage` if the file cannot be written.
pub fn clear(file: &Path) -> Result<String, CommandError> {
    apply(file, |store| store.clear().map(drop))
}

/// Run `operation` against the file-backed store, collecting notifications.
fn apply<F>(file: &Path, operation: F) -> Result<String, CommandError>
where
    F: FnOnce(&mut CartStore<FileStorage>) -> Result<(), gototech_core::StorageError>,
{
    let storage = FileStorage::new(file);
    tracing::debug!(path = %storage.path().display(), "opening cart file");
    let mut store = CartStore::load(storage);

    let notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notifications);
    let subscription = store.subscribe(move |event| {
        if let Some(notification) = event.notification() {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notification);
        }
    });

    operation(&mut store)?;
    subscription.unsubscribe();

    let notifications = notifications
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    Ok(render(store.cart(), &notifications))
}

/// Text form of the cart, prefixed by notifications.
fn render(cart: &Cart, notifications: &[Notification]) -> String {
    Listing {
        cart,
        notifications,
    }
    .to_string()
}

struct Listing<'a> {
    cart: &'a Cart,
    notifications: &'a [Notification],
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notification in self.notifications {
            writeln!(f, "[{}] {}", notification.level.as_str(), notification.message)?;
        }

        if self.cart.is_empty() {
            writeln!(f, "Tu carrito está vacío")?;
        }
        for item in self.cart.items() {
            writeln!(
                f,
                "{:>4}  {:<28} x{:<3} {:>12}",
                item.id.as_str(),
                item.name,
                item.quantity,
                item.line_total().display(),
            )?;
        }

        writeln!(f, "Productos: {}", self.cart.count())?;
        writeln!(f, "Total: {}", self.cart.total().display())
    }
}
