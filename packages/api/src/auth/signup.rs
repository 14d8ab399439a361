//! # Signup — invite-gated registration
//!
//! [`validate_signup`] checks the submitted fields without touching the
//! database. [`register_user`] then runs one transaction that
//!
//! 1. refuses an email that already has an account,
//! 2. consumes the registration code with `DELETE … RETURNING`, so two signups
//!    racing for the same code cannot both succeed,
//! 3. inserts the user with an Argon2id password hash.
//!
//! Any failure rolls the transaction back, leaving the code unconsumed.

use serde::Deserialize;
use sqlx::PgPool;

use super::{is_valid_email, normalize_email};
use super::password::{hash_password, is_long_enough, PasswordError};
use crate::db::is_unique_violation;
use crate::models::{RegistrationCode, User};

/// Shortest registration code accepted before hitting the database.
pub const MIN_CODE_LENGTH: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub registration_code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,
    #[error("Registration code must be at least 5 characters long.")]
    CodeTooShort,
    #[error("A user with that email already exists.")]
    EmailTaken,
    #[error("Invalid registration code.")]
    InvalidCode,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Field checks, in form order. No I/O.
pub fn validate_signup(form: &SignupForm) -> Result<(), SignupError> {
    let email = normalize_email(&form.email);
    if !is_valid_email(&email) {
        return Err(SignupError::InvalidEmail);
    }
    if !is_long_enough(&form.password) {
        return Err(SignupError::PasswordTooShort);
    }
    if form.registration_code.trim().chars().count() < MIN_CODE_LENGTH {
        return Err(SignupError::CodeTooShort);
    }
    Ok(())
}

/// Create an account, consuming one registration code.
pub async fn register_user(pool: &PgPool, form: &SignupForm) -> Result<User, SignupError> {
    validate_signup(form)?;

    let email = normalize_email(&form.email);
    let code = form.registration_code.trim();

    let mut tx = pool.begin().await?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(SignupError::EmailTaken);
    }

    let consumed: Option<RegistrationCode> =
        sqlx::query_as("DELETE FROM registration_codes WHERE code = $1 RETURNING *")
            .bind(code)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(consumed) = consumed else {
        tracing::warn!("signup attempted with an unknown registration code");
        return Err(SignupError::InvalidCode);
    };

    let password_hash = hash_password(&form.password)?;

    let user: User = sqlx::query_as(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *",
    )
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            SignupError::EmailTaken
        } else {
            SignupError::Database(e)
        }
    })?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, code_id = %consumed.id, "registered new user");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str, code: &str) -> SignupForm {
        SignupForm {
            email: email.into(),
            password: password.into(),
            registration_code: code.into(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(validate_signup(&form("ada@example.com", "analytical", "INVITE-1")).is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(matches!(
            validate_signup(&form("   ", "analytical", "INVITE-1")),
            Err(SignupError::InvalidEmail)
        ));
        assert!(matches!(
            validate_signup(&form("ada.example.com", "analytical", "INVITE-1")),
            Err(SignupError::InvalidEmail)
        ));
    }

    #[test]
    fn test_short_password() {
        assert!(matches!(
            validate_signup(&form("ada@example.com", "short", "INVITE-1")),
            Err(SignupError::PasswordTooShort)
        ));
    }

    #[test]
    fn test_short_code() {
        assert!(matches!(
            validate_signup(&form("ada@example.com", "analytical", " abc ")),
            Err(SignupError::CodeTooShort)
        ));
    }

    #[test]
    fn test_checks_run_in_form_order() {
        assert!(matches!(
            validate_signup(&form("nope", "x", "y")),
            Err(SignupError::InvalidEmail)
        ));
        assert!(matches!(
            validate_signup(&form("ada@example.com", "x", "y")),
            Err(SignupError::PasswordTooShort)
        ));
    }
}
