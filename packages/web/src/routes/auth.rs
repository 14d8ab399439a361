//! Signup, login and logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tower_sessions::Session;

use notebook_api::auth::{normalize_email, register_user, verify_password, SignupForm, SESSION_USER_ID_KEY};
use notebook_api::{db, User, UserInfo};

use super::{message, Message};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn invalid_login() -> AppError {
    AppError::user(StatusCode::UNAUTHORIZED, "Invalid email or password.")
}

pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> Result<(StatusCode, Json<UserInfo>), AppError> {
    let user = register_user(&state.pool, &form).await?;
    Ok((StatusCode::CREATED, Json(user.to_info())))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<UserInfo>, AppError> {
    let email = normalize_email(&form.email);
    let found = db::users::find_by_email(&state.pool, &email).await?;
    let user = check_credentials(found, &email, &form.password)?;

    // Fresh id so a planted pre-login session cannot be reused.
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id.to_string()).await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(user.to_info()))
}

/// Every refusal looks the same to the client and is logged at `warn`.
fn check_credentials(found: Option<User>, email: &str, password: &str) -> Result<User, AppError> {
    let Some(user) = found else {
        tracing::warn!(email, reason = "unknown email", "login failed");
        return Err(invalid_login());
    };

    let verified = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
        tracing::warn!(email, user_id = %user.id, error = %e, "stored password hash is unreadable");
        false
    });
    if !verified {
        tracing::warn!(email, user_id = %user.id, reason = "wrong password", "login failed");
        return Err(invalid_login());
    }
    Ok(user)
}

pub async fn logout(session: Session) -> Result<Json<Message>, AppError> {
    session.flush().await?;
    Ok(message("Logged out."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notebook_api::auth::hash_password;
    use tracing_test::traced_test;
    use uuid::Uuid;

    const EMAIL: &str = "ada@example.com";

    fn user(password_hash: String) -> User {
        User {
            id: Uuid::new_v4(),
            email: EMAIL.into(),
            password_hash,
            is_admin: false,
            profile_image: None,
            profile_image_type: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_correct_password() {
        let found = user(hash_password("analytical").unwrap());
        let id = found.id;
        assert_eq!(check_credentials(Some(found), EMAIL, "analytical").unwrap().id, id);
    }

    #[test]
    #[traced_test]
    fn test_unknown_email_is_logged() {
        let err = check_credentials(None, EMAIL, "analytical").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("unknown email"));
    }

    #[test]
    #[traced_test]
    fn test_wrong_password_is_logged() {
        let found = user(hash_password("analytical").unwrap());
        let err = check_credentials(Some(found), EMAIL, "difference").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("wrong password"));
    }

    #[test]
    #[traced_test]
    fn test_malformed_hash_is_a_failed_login() {
        let err = check_credentials(Some(user("not-a-phc-string".into())), EMAIL, "analytical")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(logs_contain("stored password hash is unreadable"));
    }
}
