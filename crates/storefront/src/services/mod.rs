//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart store for the current visitor
//! - `catalog` - Cached product lookups

pub mod cart;
pub mod catalog;

pub use cart::{CartOutcome, CartSession, SessionStorage};
pub use catalog::Catalog;
