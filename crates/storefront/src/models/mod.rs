//! Domain models for storefront.
//!
//! Cart types live in `gototech_core::cart`; this module holds the records
//! only the storefront stores.

pub mod contact;

pub use contact::{ContactMessage, NewContactMessage};
