//! Queries on the `users` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AccountChanges;
use crate::models::User;
use crate::profile_image::InlineImage;

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// ID of the account that owns `email`, if any.
pub async fn email_owner(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users ORDER BY created_at")
        .fetch_all(pool)
        .await
}

/// Write an approved account update. Returns the refreshed row.
///
/// The `UNIQUE` constraint on `email` is the final arbiter: a concurrent signup
/// that claimed the address after the policy check surfaces here as a
/// unique violation.
pub async fn apply_account_changes(
    pool: &PgPool,
    id: Uuid,
    changes: &AccountChanges,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.email)
    .bind(&changes.password_hash)
    .fetch_one(pool)
    .await
}

pub async fn set_profile_image(
    pool: &PgPool,
    id: Uuid,
    image: &InlineImage,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET
            profile_image = $2,
            profile_image_type = $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&image.bytes)
    .bind(&image.mime_type)
    .fetch_one(pool)
    .await
}

/// Set the admin flag. `None` when no such user exists.
pub async fn set_admin(pool: &PgPool, id: Uuid, is_admin: bool) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE users SET is_admin = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(is_admin)
    .fetch_optional(pool)
    .await
}
