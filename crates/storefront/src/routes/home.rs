//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use gototech_core::Product;

use crate::filters;
use crate::services::CartSession;
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.unit_price().display(),
            image: product.image.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Product grid, each card with an add-to-cart button.
    pub products: Vec<ProductCardView>,
    /// Badge count for the header.
    pub cart_count: u64,
    /// How long notifications stay on screen.
    pub notification_ms: u64,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let products = state.catalog().list().await.map_or_else(
        |e| {
            tracing::error!("Failed to load catalog: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductCardView::from).collect(),
    );

    let cart = CartSession::open(&session).await;

    HomeTemplate {
        products,
        cart_count: cart.cart().count(),
        notification_ms: state.config().notification_ms,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gototech_core::{ProductId, catalog};

    use super::*;

    #[test]
    fn test_home_renders_add_buttons() {
        let keyboard = catalog::find(&ProductId::new("1")).unwrap();
        let html = HomeTemplate {
            products: vec![ProductCardView::from(&keyboard)],
            cart_count: 3,
            notification_ms: 3000,
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"hx-post="/cart/add""#));
        assert!(html.contains(r#"name="product_id" value="1""#));
        assert!(html.contains("S/. 150.00"));
        assert!(html.contains(r#"id="cart-count""#));
    }
}
