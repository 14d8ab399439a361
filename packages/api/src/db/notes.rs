//! Queries on the `notes` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Note;
use crate::notes::NoteDraft;

pub async fn create(pool: &PgPool, user_id: Uuid, draft: &NoteDraft) -> Result<Note, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO notes (title, text, private, user_id) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(draft.private)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Note>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM notes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Overwrite a note's content. Only matches when `user_id` owns the note.
pub async fn update_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    draft: &NoteDraft,
) -> Result<Option<Note>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE notes SET title = $3, text = $4, private = $5
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&draft.title)
    .bind(&draft.text)
    .bind(draft.private)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Notes owned by `user_id`, newest first.
pub async fn list_owned(pool: &PgPool, user_id: Uuid) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM notes WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Notes visible to `user_id`: their own plus everyone's shared notes.
pub async fn list_visible(pool: &PgPool, user_id: Uuid) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM notes WHERE user_id = $1 OR NOT private ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the text of `user_id`'s own notes.
pub async fn search_owned(
    pool: &PgPool,
    user_id: Uuid,
    term: &str,
) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM notes
        WHERE user_id = $1 AND strpos(lower(text), lower($2)) > 0
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(term)
    .fetch_all(pool)
    .await
}
