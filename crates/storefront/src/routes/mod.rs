//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Home page (product grid)
//! GET  /health            - Liveness
//! GET  /health/ready      - Readiness with table counts
//!
//! # Cart (HTMX)
//! GET  /cart              - Cart page
//! POST /cart/add          - Add one unit (returns badge)
//! POST /cart/update       - Adjust quantity by delta (returns listing)
//! POST /cart/remove       - Remove a line (returns listing)
//! GET  /cart/count        - Badge fragment
//! GET  /cart/items        - Listing fragment
//!
//! # API
//! GET  /api/products      - Catalog as JSON
//! POST /api/contact       - Store a contact message
//! ```

pub mod cart;
pub mod contact;
pub mod health;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/items", get(cart::items))
}

/// Build the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/contact", post(contact::submit))
}

/// Build the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Build the complete router for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}
