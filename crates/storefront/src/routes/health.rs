//! Health check endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::db::{ContactRepository, ProductRepository};
use crate::state::AppState;

/// Readiness report.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub status: &'static str,
    pub products: i64,
    pub contacts: i64,
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity and reports table sizes.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(
    State(state): State<AppState>,
) -> Result<Json<Readiness>, StatusCode> {
    let products = ProductRepository::new(state.pool()).count().await;
    let contacts = ContactRepository::new(state.pool()).count().await;

    match (products, contacts) {
        (Ok(products), Ok(contacts)) => Ok(Json(Readiness {
            status: "ok",
            products,
            contacts,
        })),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
