//! Contact form route handlers.
//!
//! Stores messages left through the site's contact form.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use gototech_core::Email;

use crate::db::ContactRepository;
use crate::models::NewContactMessage;
use crate::state::AppState;

/// Contact form data.
///
/// The Spanish field names `nombre`, `telefono` and `mensaje` are accepted too.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    #[serde(alias = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(alias = "telefono")]
    pub phone: Option<String>,
    #[serde(alias = "mensaje")]
    pub message: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    fn reply(status: StatusCode, success: bool, message: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success,
                message: message.to_string(),
            }),
        )
    }
}

/// Submit a contact message.
///
/// POST /api/contact
///
/// Bodies that are not a JSON object get the same `{success, message}` reply
/// as a failed validation.
#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> impl IntoResponse {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected contact payload");
            return ContactResponse::reply(
                rejection.status(),
                false,
                "No pudimos leer el formulario. Intenta nuevamente.",
            );
        }
    };

    let name = form.name.trim();
    let message = form.message.trim();

    if name.is_empty() || form.email.trim().is_empty() || message.is_empty() {
        return ContactResponse::reply(
            StatusCode::BAD_REQUEST,
            false,
            "Faltan campos requeridos",
        );
    }

    let Ok(email) = Email::parse(&form.email) else {
        return ContactResponse::reply(
            StatusCode::BAD_REQUEST,
            false,
            "Ingresa un correo electrónico válido.",
        );
    };

    let phone = form
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from);

    let new = NewContactMessage {
        name: name.to_string(),
        email,
        phone,
        message: message.to_string(),
    };

    match ContactRepository::new(state.pool()).create(&new).await {
        Ok(saved) => {
            tracing::info!(
                contact_id = %saved.id,
                email = %saved.email,
                "Contact message stored"
            );
            ContactResponse::reply(StatusCode::OK, true, "Mensaje recibido correctamente")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to store contact message");
            ContactResponse::reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                false,
                "Error al enviar el mensaje. Intenta nuevamente.",
            )
        }
    }
}
