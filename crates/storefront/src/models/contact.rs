//! Contact form messages.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gototech_core::{ContactId, Email};

/// A validated message ready to be stored.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
}

/// A stored contact message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
