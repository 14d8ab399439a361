//! Admin-only user management. Reachable only through `require_admin`.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use notebook_api::auth::plan_role_change;
use notebook_api::{db, UserInfo};

use crate::error::AppError;
use crate::middleware::AdminUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub is_admin: bool,
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(AdminUser(_)): Extension<AdminUser>,
) -> Result<Json<Vec<UserInfo>>, AppError> {
    let users = db::users::list(&state.pool).await?;
    Ok(Json(users.iter().map(|u| u.to_info()).collect()))
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(AdminUser(admin)): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(form): Json<RoleForm>,
) -> Result<Json<UserInfo>, AppError> {
    plan_role_change(admin.id, id, form.is_admin)?;

    let user = db::users::set_admin(&state.pool, id, form.is_admin)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    tracing::info!(admin_id = %admin.id, user_id = %id, is_admin = form.is_admin, "role changed");
    Ok(Json(user.to_info()))
}
