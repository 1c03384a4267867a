//! Contact message repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use gototech_core::{ContactId, Email};

use super::RepositoryError;
use crate::models::contact::{ContactMessage, NewContactMessage};

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for ContactMessage {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email,
            phone: row.phone,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Repository for contact form messages.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r"
            INSERT INTO contacts (name, email, phone, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, message, created_at
            ",
        )
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(new.phone.as_deref())
        .bind(&new.message)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        ContactMessage::try_from(row)
    }

    /// Number of stored messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
