//! # Capability middleware
//!
//! Authorization happens once, at the router boundary. [`require_login`]
//! resolves the session to a [`CurrentUser`]; [`require_admin`] does the same
//! and then insists on the admin flag, handing out an [`AdminUser`]. Handlers
//! take the capability as an `Extension` and never look at the session.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;
use uuid::Uuid;

use notebook_api::auth::SESSION_USER_ID_KEY;
use notebook_api::{db, User};

use crate::error::AppError;
use crate::state::AppState;

/// A signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// A signed-in user holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// Resolve the session to its user, if any.
async fn session_user(state: &AppState, session: &Session) -> Result<Option<User>, AppError> {
    let Some(user_id) = session.get::<String>(SESSION_USER_ID_KEY).await? else {
        return Ok(None);
    };
    let Ok(user_id) = Uuid::parse_str(&user_id) else {
        tracing::warn!("session carries a malformed user id");
        return Ok(None);
    };

    let user = db::users::find_by_id(&state.pool, user_id).await?;
    if user.is_none() {
        // Account removed while the session was alive.
        session.flush().await?;
    }
    Ok(user)
}

pub async fn require_login(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_user(&state, &session)
        .await?
        .ok_or_else(AppError::unauthenticated)?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = session_user(&state, &session)
        .await?
        .ok_or_else(AppError::unauthenticated)?;

    if !user.is_admin {
        tracing::warn!(user_id = %user.id, path = %req.uri().path(), "non-admin refused");
        return Err(AppError::forbidden());
    }

    req.extensions_mut().insert(AdminUser(user));
    Ok(next.run(req).await)
}
