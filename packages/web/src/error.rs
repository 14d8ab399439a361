//! # Error responses
//!
//! Every handler returns `Result<_, AppError>`. User mistakes become a 4xx with
//! a JSON body `{"error": "<message>"}` carrying the domain error's own
//! message; database, session and hashing failures are logged and reported as
//! a bare 500.
//!
//! | Source | Status |
//! |--------|--------|
//! | form validation (signup fields, note title, password rules) | 422 |
//! | not signed in, bad login | 401 |
//! | wrong current password, missing admin capability, self-demotion | 403 |
//! | missing note or user | 404 |
//! | email already used | 409 |
//! | image over the size cap | 413 |
//! | image host unreachable or failing | 502 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use notebook_api::auth::{PasswordError, RejectReason, RoleChangeError, SignupError};
use notebook_api::notes::NoteError;
use notebook_api::profile_image::ImageFetchError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    User { status: StatusCode, message: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AppError {
    pub fn user(status: StatusCode, message: impl Into<String>) -> Self {
        Self::User {
            status,
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::user(StatusCode::UNAUTHORIZED, "Please log in to access this page.")
    }

    pub fn forbidden() -> Self {
        Self::user(StatusCode::FORBIDDEN, "You are not authorised to view that page.")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::user(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::User { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::User { message, .. } => message,
            internal => {
                tracing::error!(error = %internal, "request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        let status = match reason {
            RejectReason::WrongPassword => StatusCode::FORBIDDEN,
            RejectReason::EmailInUse => StatusCode::CONFLICT,
            RejectReason::ReauthRequired
            | RejectReason::PasswordMismatch
            | RejectReason::PasswordTooShort
            | RejectReason::PasswordUnchanged => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::user(status, reason.to_string())
    }
}

impl From<SignupError> for AppError {
    fn from(err: SignupError) -> Self {
        let status = match err {
            SignupError::Password(e) => return e.into(),
            SignupError::Database(e) => return e.into(),
            SignupError::EmailTaken => StatusCode::CONFLICT,
            SignupError::InvalidCode => StatusCode::FORBIDDEN,
            SignupError::InvalidEmail | SignupError::PasswordTooShort | SignupError::CodeTooShort => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self::user(status, err.to_string())
    }
}

impl From<ImageFetchError> for AppError {
    fn from(err: ImageFetchError) -> Self {
        let status = match err {
            ImageFetchError::UnsafeUrl | ImageFetchError::NotAnImage => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ImageFetchError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ImageFetchError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
        };
        Self::user(status, err.to_string())
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        let status = match err {
            NoteError::TitleRequired => StatusCode::UNPROCESSABLE_ENTITY,
            NoteError::NotFound | NoteError::NotDeletable => StatusCode::NOT_FOUND,
        };
        Self::user(status, err.to_string())
    }
}

impl From<RoleChangeError> for AppError {
    fn from(err: RoleChangeError) -> Self {
        Self::user(StatusCode::FORBIDDEN, err.to_string())
    }
}
