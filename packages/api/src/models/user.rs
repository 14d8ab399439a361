//! # User model
//!
//! ## [`User`]
//!
//! The complete row from the `users` table, loaded with [`sqlx::FromRow`]:
//!
//! - `id` — primary key (`UUID v4`).
//! - `email` — unique, stored trimmed and lowercased.
//! - `password_hash` — Argon2id PHC string.
//! - `is_admin` — changed only through the admin role page.
//! - `profile_image` / `profile_image_type` — raw image bytes fetched by the
//!   image guard and the MIME type they were served with.
//! - `created_at` / `updated_at` — audit timestamps.
//!
//! ## [`UserInfo`]
//!
//! The subset returned to clients. It never carries the password hash, and it
//! renders the profile image as a `data:` URI ready to drop into an `<img>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::profile_image::{InlineImage, DEFAULT_IMAGE_TYPE};

/// Full user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub profile_image: Option<Vec<u8>>,
    pub profile_image_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        let profile_image = self.profile_image.as_ref().map(|bytes| {
            InlineImage {
                bytes: bytes.clone(),
                mime_type: self
                    .profile_image_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string()),
            }
            .to_data_uri()
        });

        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            profile_image,
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub profile_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            is_admin: false,
            profile_image: None,
            profile_image_type: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_info_omits_hash() {
        let info = user().to_info();
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("argon2"));
        assert!(info.profile_image.is_none());
    }

    #[test]
    fn test_info_profile_image_defaults_to_png() {
        let mut user = user();
        user.profile_image = Some(vec![1, 2, 3]);

        assert_eq!(
            user.to_info().profile_image.as_deref(),
            Some("data:image/png;base64,AQID")
        );

        user.profile_image_type = Some("image/gif".into());
        assert_eq!(
            user.to_info().profile_image.as_deref(),
            Some("data:image/gif;base64,AQID")
        );
    }
}
