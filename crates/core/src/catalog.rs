//! Built-in sample catalog.
//!
//! These are the products shown on the accessories page before a real
//! inventory is loaded. The storefront seeds its `products` table from here
//! and the terminal cart adds products by these ids.

use rust_decimal::Decimal;

use crate::cart::Product;
use crate::types::ProductId;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/80/0076ff/ffffff?text=";

/// Catalog category of a product.
pub const ACCESSORIES: &str = "accesorios";

/// The sample products, in display order.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    [
        (
            "1",
            "Teclado Mecánico RGB",
            "Teclado gaming con retroiluminación RGB",
            15_000,
            "Teclado",
        ),
        (
            "2",
            "Mouse Inalámbrico",
            "Mouse ergonómico con conexión Bluetooth",
            8_000,
            "Mouse",
        ),
        (
            "3",
            "Audífonos Gaming",
            "Audífonos con micrófono y sonido envolvente",
            20_000,
            "Audifonos",
        ),
    ]
    .into_iter()
    .map(|(id, name, description, cents, label)| Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Decimal::new(cents, 2),
        image: format!("{PLACEHOLDER_IMAGE}{label}"),
    })
    .collect()
}

/// Look up a sample product by id.
#[must_use]
pub fn find(id: &ProductId) -> Option<Product> {
    sample_products().into_iter().find(|product| &product.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ids_are_unique() {
        let products = sample_products();
        let mut ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn test_find_known_and_unknown() {
        let mouse = find(&ProductId::new("2")).unwrap();
        assert_eq!(mouse.price, Decimal::from(80));
        assert!(find(&ProductId::new("42")).is_none());
    }

    #[test]
    fn test_images_point_at_placeholder_service() {
        for product in sample_products() {
            assert!(product.image.starts_with("https://"));
        }
    }
}
