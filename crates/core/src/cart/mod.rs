//! The shopping cart.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by product id, with
//! every quantity at least 1. It is persisted as a JSON array under
//! [`CART_STORAGE_KEY`] through a [`CartStorage`] backend, and mutated only
//! through a [`CartStore`].

mod events;
mod store;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::price::{self, PriceError};
use crate::types::{Price, ProductId};

pub use events::{CartEvent, Notification, NotificationLevel, Subscription};
pub use store::{CART_STORAGE_KEY, CartStorage, CartStore, MemoryStorage, StorageError};

/// A product as listed in the catalog; the input to [`CartStore::add`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in soles.
    #[serde(with = "price::as_number")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Build a product, rejecting negative prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `price` is below zero.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Result<Self, PriceError> {
        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            price: price::validate_amount(price)?,
            image: image.into(),
        })
    }

    /// Unit price with currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::soles(self.price)
    }
}

/// One product entry in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "price::as_number")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl LineItem {
    /// A fresh line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Unit price with currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::soles(self.price)
    }

    /// `price * quantity`, unrounded.
    ///
    /// Saturates at [`Decimal::MAX`] when the product is out of range.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::soles(self.subtotal())
    }

    fn subtotal(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Ordered line items, unique by id, every quantity >= 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from arbitrary line items, restoring the invariants.
    ///
    /// Lines with quantity 0 are dropped. Repeated ids are folded into the
    /// first occurrence with their quantities summed, saturating at
    /// `u32::MAX`.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Parse the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when `raw` is not an array of line items.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let items: Vec<LineItem> = serde_json::from_str(raw)?;
        Ok(Self::from_items(items))
    }

    /// Serialize to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if a price has no `f64` representation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines (the badge number).
    ///
    /// Each line holds at most `u32::MAX` units, so the sum is exact in a
    /// `u64` for any realistic number of lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity))
            .fold(0, u64::saturating_add)
    }

    /// Sum of `price * quantity` across all lines.
    ///
    /// Amounts past the decimal range saturate at [`Decimal::MAX`] instead of
    /// overflowing.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount = self
            .items
            .iter()
            .map(LineItem::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Price::soles(amount)
    }

    /// Increment the line for `product`, or append a new line with quantity 1.
    /// A line already at `u32::MAX` stays there.
    ///
    /// Returns the line's quantity after the change.
    pub(crate) fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items.push(LineItem::from_product(product));
        1
    }

    /// Drop the line for `id`. Returns the removed line, if any.
    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<LineItem> {
        let index = self.position(id)?;
        Some(self.items.remove(index))
    }

    /// Set an existing line's quantity. `quantity` must be at least 1.
    pub(crate) fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        debug_assert!(quantity >= 1);
        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(id: &str, price: &str) -> Product {
        Product::new(
            id,
            format!("Product {id}"),
            "A test product",
            Decimal::from_str(price).unwrap(),
            "https://example.com/p.png",
        )
        .unwrap()
    }

    #[test]
    fn test_add_same_product_twice_increments() {
        let mut cart = Cart::new();
        let keyboard = product("1", "150.00");

        assert_eq!(cart.add(&keyboard), 1);
        assert_eq!(cart.add(&keyboard), 2);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product("2", "80"));
        cart.add(&product("1", "150"));
        cart.add(&product("2", "80"));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add(&product("1", "150.00"));
        cart.add(&product("2", "80.00"));
        assert_eq!(cart.total().to_string(), "S/. 230.00");

        cart.add(&product("2", "80.00"));
        assert_eq!(cart.total().to_string(), "S/. 310.00");
    }

    #[test]
    fn test_total_of_fractional_prices_is_exact() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(&product("1", "0.10"));
        }
        assert_eq!(cart.total().amount, Decimal::from_str("0.30").unwrap());
    }

    #[test]
    fn test_count_sums_quantities() {
        let mut cart = Cart::new();
        assert_eq!(cart.count(), 0);
        cart.add(&product("1", "1"));
        cart.add(&product("1", "1"));
        cart.add(&product("2", "1"));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_count_does_not_wrap_at_u32() {
        let line = |id: &str| LineItem {
            quantity: u32::MAX,
            ..LineItem::from_product(&product(id, "1"))
        };
        let cart = Cart::from_items([line("1"), line("2")]);

        assert_eq!(cart.count(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_total_saturates_instead_of_overflowing() {
        let raw = r#"[{"id":"2","name":"Mouse","price":1e20,"quantity":4294967295}]"#;
        let cart = Cart::from_json(raw).unwrap();

        assert_eq!(cart.items()[0].line_total().amount, Decimal::MAX);
        assert_eq!(cart.total().amount, Decimal::MAX);
    }

    #[test]
    fn test_total_saturates_across_lines() {
        let line = |id: &str| LineItem {
            quantity: 1,
            ..LineItem::from_product(&product(id, "1"))
        };
        let mut big = line("1");
        big.price = Decimal::MAX;

        let cart = Cart::from_items([big, line("2")]);
        assert_eq!(cart.total().amount, Decimal::MAX);
    }

    #[test]
    fn test_from_items_saturates_merged_quantity() {
        let line = |quantity: u32| LineItem {
            quantity,
            ..LineItem::from_product(&product("1", "1"))
        };
        let cart = Cart::from_items([line(u32::MAX), line(5)]);

        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("1", "150"));
        let before = cart.clone();

        assert!(cart.remove(&ProductId::new("99")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_from_items_restores_invariants() {
        let line = |id: &str, quantity: u32| LineItem {
            quantity,
            ..LineItem::from_product(&product(id, "10"))
        };

        let cart = Cart::from_items([line("1", 2), line("2", 0), line("1", 3), line("3", 1)]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&ProductId::new("1")).unwrap().quantity, 5);
        assert!(cart.get(&ProductId::new("2")).is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_items_and_order() {
        let mut cart = Cart::new();
        cart.add(&product("2", "79.90"));
        cart.add(&product("1", "150"));
        cart.add(&product("1", "150"));

        let json = cart.to_json().unwrap();
        let loaded = Cart::from_json(&json).unwrap();
        assert_eq!(loaded, cart);
    }

    #[test]
    fn test_json_layout_matches_persisted_format() {
        let raw = r#"[{"id":"1","name":"Teclado","description":"RGB","price":150,"image":"k.png","quantity":2}]"#;
        let cart = Cart::from_json(raw).unwrap();

        let item = &cart.items()[0];
        assert_eq!(item.id.as_str(), "1");
        assert_eq!(item.price, Decimal::from(150));
        assert_eq!(item.quantity, 2);

        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert!(value[0]["price"].is_number());
        assert_eq!(value[0]["quantity"], 2);
    }

    #[test]
    fn test_from_json_rejects_negative_price() {
        let raw = r#"[{"id":"1","name":"x","price":-5,"quantity":1}]"#;
        assert!(Cart::from_json(raw).is_err());
    }

    #[test]
    fn test_product_rejects_negative_price() {
        let result = Product::new("1", "x", "", Decimal::from(-1), "");
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }
}
