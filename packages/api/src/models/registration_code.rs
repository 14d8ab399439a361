//! Single-use invite codes.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An unused registration code. Rows are deleted when a signup consumes them.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationCode {
    pub id: Uuid,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
