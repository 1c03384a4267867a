//! Product catalog API.

use axum::{Json, extract::State};
use tracing::instrument;

use gototech_core::Product;

use crate::error::Result;
use crate::state::AppState;

/// List the catalog.
///
/// GET /api/products
///
/// Prices are JSON numbers, matching the stored cart format.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.catalog().list().await?;
    Ok(Json(products))
}
