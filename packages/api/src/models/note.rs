//! Note model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A note row. `title` and `text` are stored already sanitized.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub text: String,
    pub private: bool,
    pub user_id: Uuid,
}
