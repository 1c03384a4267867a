//! GotoTech Core - Cart store and shared types.
//!
//! This crate provides the pieces shared by every GotoTech component:
//! - `storefront` - Public-facing site with the HTMX cart
//! - `cli` - Command-line tools for migrations, seeding, and a terminal cart
//!
//! # Architecture
//!
//! The core crate contains types, the cart model, and the storage trait the
//! cart is persisted through - no network, no database, no HTTP. Storage
//! backends that touch the outside world live in the crates that own them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, and emails
//! - [`cart`] - Line items, the cart model, and the persisted [`CartStore`]
//! - [`catalog`] - The built-in sample product catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{
    CART_STORAGE_KEY, Cart, CartEvent, CartStorage, CartStore, LineItem, MemoryStorage,
    Notification, NotificationLevel, Product, StorageError, Subscription,
};
pub use types::*;
