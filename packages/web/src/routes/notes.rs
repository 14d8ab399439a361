//! Note handlers. Ownership is enforced in the queries themselves.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use notebook_api::notes::{can_delete, NoteDraft, NoteError, NoteForm};
use notebook_api::{db, Note};

use super::{message, Message};
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// The user's own notes plus every note another user shared.
pub async fn list_visible(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(db::notes::list_visible(&state.pool, user.id).await?))
}

pub async fn list_own(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(db::notes::list_owned(&state.pool, user.id).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = db::notes::search_owned(&state.pool, user.id, query.search.trim()).await?;
    Ok(Json(notes))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(form): Json<NoteForm>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let draft = NoteDraft::from_form(&form)?;
    let note = db::notes::create(&state.pool, user.id, &draft).await?;

    tracing::info!(user_id = %user.id, note_id = %note.id, "note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn edit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(form): Json<NoteForm>,
) -> Result<Json<Note>, AppError> {
    let draft = NoteDraft::from_form(&form)?;
    let note = db::notes::update_owned(&state.pool, id, user.id, &draft)
        .await?
        .ok_or(NoteError::NotFound)?;
    Ok(Json(note))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    let note = db::notes::find(&state.pool, id)
        .await?
        .ok_or(NoteError::NotDeletable)?;
    if !can_delete(note.user_id, user.id, user.is_admin) {
        return Err(NoteError::NotDeletable.into());
    }

    db::notes::delete(&state.pool, id).await?;
    tracing::info!(user_id = %user.id, note_id = %id, "note deleted");
    Ok(message("Note deleted."))
}
