//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session (see
//! [`crate::services::cart`]). Every mutation answers with an `HX-Trigger`
//! header carrying `cart-updated` and, when the change has one, a `notify`
//! payload for the page to display.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gototech_core::{Cart, LineItem, Notification, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::services::{CartOutcome, CartSession};
use crate::state::AppState;

/// HTMX response header for client-side events.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: item.unit_price().display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Quantity adjustment form data (`delta` is usually `1` or `-1`).
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notification_ms: u64,
}

/// Cart listing fragment template (for HTMX).
///
/// Also swaps the total and the badge out-of-band.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// HTMX Helpers
// =============================================================================

/// Build the `HX-Trigger` value for a finished cart mutation.
fn cart_trigger(outcome: &CartOutcome) -> Option<HeaderValue> {
    let mut events = serde_json::Map::new();
    events.insert(
        "cart-updated".to_string(),
        serde_json::json!({ "count": outcome.cart.count() }),
    );
    if let Some(notification) = outcome.notifications.last() {
        events.insert("notify".to_string(), notification_json(notification));
    }

    let json = serde_json::Value::Object(events).to_string();
    HeaderValue::from_str(&escape_non_ascii(&json)).ok()
}

fn notification_json(notification: &Notification) -> serde_json::Value {
    serde_json::to_value(notification).unwrap_or_else(|_| {
        serde_json::json!({ "message": notification.message, "level": notification.level.as_str() })
    })
}

/// Header values must be visible ASCII; product names are not.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            let mut units = [0_u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}

/// Attach the trigger header to a fragment.
fn with_trigger(outcome: &CartOutcome, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Some(value) = cart_trigger(outcome) {
        response.headers_mut().insert(HX_TRIGGER, value);
    }
    response
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let cart = CartSession::open(&session).await;

    CartShowTemplate {
        cart: CartView::from(cart.cart()),
        notification_ms: state.config().notification_ms,
    }
}

/// Add one unit of a product (HTMX).
///
/// Returns the updated badge and triggers `cart-updated` plus a success
/// notification naming the product.
///
/// # Errors
///
/// Returns 404 if the product is not in the catalog.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .find(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = CartSession::open(&session).await;
    cart.store().add(&product)?;
    let outcome = cart.close(&session).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));

    let count = outcome.cart.count();
    Ok(with_trigger(&outcome, CartCountTemplate { count }))
}

/// Adjust a line's quantity (HTMX).
///
/// A quantity driven below 1 removes the line. Unknown ids re-render the
/// listing unchanged.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateQuantityForm>) -> Result<Response> {
    let id = ProductId::new(form.product_id);

    let mut cart = CartSession::open(&session).await;
    cart.store().update_quantity(&id, form.delta)?;
    let outcome = cart.close(&session).await?;

    let view = CartView::from(&outcome.cart);
    Ok(with_trigger(&outcome, CartItemsTemplate { cart: view }))
}

/// Remove a line (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Response> {
    let id = ProductId::new(form.product_id);

    let mut cart = CartSession::open(&session).await;
    cart.store().remove(&id)?;
    let outcome = cart.close(&session).await?;

    add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));

    let view = CartView::from(&outcome.cart);
    Ok(with_trigger(&outcome, CartItemsTemplate { cart: view }))
}

/// Cart listing fragment (HTMX).
#[instrument(skip(session))]
pub async fn items(session: Session) -> CartItemsTemplate {
    let cart = CartSession::open(&session).await;
    CartItemsTemplate {
        cart: CartView::from(cart.cart()),
    }
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let cart = CartSession::open(&session).await;
    CartCountTemplate {
        count: cart.cart().count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gototech_core::{CartStore, MemoryStorage, catalog};

    use super::*;

    fn outcome_with(notifications: Vec<Notification>) -> CartOutcome {
        let mut store = CartStore::load(MemoryStorage::new());
        store.add(&catalog::find(&ProductId::new("1")).unwrap()).unwrap();
        CartOutcome {
            cart: store.cart().clone(),
            notifications,
        }
    }

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape_non_ascii("Audífonos"), "Aud\\u00edfonos");
        assert_eq!(escape_non_ascii("plain"), "plain");
        assert_eq!(escape_non_ascii("🎧"), "\\ud83c\\udfa7");
    }

    #[test]
    fn test_cart_trigger_carries_count_and_notification() {
        let outcome = outcome_with(vec![Notification::success(
            "Teclado Mecánico RGB agregado al carrito",
        )]);
        let header = cart_trigger(&outcome).unwrap();

        let value: serde_json::Value = serde_json::from_str(header.to_str().unwrap()).unwrap();
        assert_eq!(value["cart-updated"]["count"], 1);
        assert_eq!(value["notify"]["level"], "success");
        assert_eq!(
            value["notify"]["message"],
            "Teclado Mecánico RGB agregado al carrito"
        );
    }

    #[test]
    fn test_cart_trigger_without_notification() {
        let outcome = outcome_with(Vec::new());
        let header = cart_trigger(&outcome).unwrap();

        let value: serde_json::Value = serde_json::from_str(header.to_str().unwrap()).unwrap();
        assert!(value.get("notify").is_none());
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let outcome = outcome_with(Vec::new());
        let view = CartView::from(&outcome.cart);

        assert_eq!(view.item_count, 1);
        assert_eq!(view.total, "S/. 150.00");
        assert_eq!(view.items.first().unwrap().price, "S/. 150.00");
    }

    #[test]
    fn test_empty_cart_renders_empty_block() {
        let html = CartItemsTemplate {
            cart: CartView::from(&Cart::new()),
        }
        .render()
        .unwrap();

        assert!(html.contains("empty-cart"));
        assert!(html.contains("S/. 0.00"));
    }

    #[test]
    fn test_listing_exposes_controls_per_item() {
        let outcome = outcome_with(Vec::new());
        let html = CartItemsTemplate {
            cart: CartView::from(&outcome.cart),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"hx-post="/cart/update""#));
        assert!(html.contains(r#"hx-post="/cart/remove""#));
        assert!(html.contains(r#"name="delta" value="-1""#));
        assert!(html.contains(r#"name="delta" value="1""#));
        assert!(html.contains(r#"name="product_id" value="1""#));
    }
}
